//! Largest-component selection

use log::info;

use crate::errors::{RiverError, RiverResult};

use super::assemble::Component;

/// Returns the component with the greatest area
///
/// Ties go to the earliest component. An empty list is a caller error.
pub fn select_largest(components: Vec<Component>) -> RiverResult<Component> {
    let mut largest: Option<Component> = None;

    for component in components {
        match &largest {
            Some(best) if component.area > best.area => largest = Some(component),
            Some(_) => {}
            None => largest = Some(component),
        }
    }

    let largest = largest.ok_or(RiverError::EmptyInput)?;
    info!("Selected component {} with area {}", largest.index, largest.area);
    Ok(largest)
}
