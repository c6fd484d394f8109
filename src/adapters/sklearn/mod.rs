//! scikit-learn adapter: Fitted components exported as JSON.
//!
//! The training notebook exports each fitted estimator's parameters
//! (`categories_`, `mean_`, `scale_`, `coef_`, tree arrays, `classes_`) to
//! JSON. These types deserialize those exports and implement the stage ports.

mod classifier;
mod encoder;
mod scaler;
mod transformer;

pub use classifier::{DecisionTree, ExportedClassifier, SklearnClassifier};
pub use encoder::LabelEncoder;
pub use scaler::StandardScaler;
pub use transformer::{ColumnEncoder, ColumnTransformer, ExportedColumnTransformer, Remainder};
