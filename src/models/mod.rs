pub mod assignment;
pub mod course;

pub use assignment::{
    Assignment, AssignmentCategory, AssignmentStatus, NewAssignmentRequest, Priority,
    UpdateAssignmentRequest,
};
pub use course::{Course, NewCourseRequest, UpdateCourseRequest};

use serde::{Deserialize, Deserializer};

/// Deserializes a nullable PATCH field. A missing key stays `None` through
/// `#[serde(default)]`; an explicit `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
