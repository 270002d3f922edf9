//! Layout checks applied to bulk data before it is handed to the bridge.
//!
//! Both checks are pure. They return a [`LayoutError`] naming the owning
//! object and the attribute, and leave reporting and aborting to the caller.

use crate::array::DataLayout;
use crate::error::LayoutError;

/// Reject any layout with more than one axis.
pub fn assert_one_dimensional(
    layout: &DataLayout,
    object: &str,
    attribute: &str,
) -> Result<(), LayoutError> {
    if layout.is_one_dimensional() {
        Ok(())
    } else {
        Err(LayoutError::NotOneDimensional {
            object: object.to_string(),
            attribute: attribute.to_string(),
        })
    }
}

/// Reject any layout with a non-zero stride on any axis.
pub fn assert_dense(layout: &DataLayout, object: &str, attribute: &str) -> Result<(), LayoutError> {
    if layout.is_dense() {
        Ok(())
    } else {
        Err(LayoutError::Strided {
            object: object.to_string(),
            attribute: attribute.to_string(),
        })
    }
}
