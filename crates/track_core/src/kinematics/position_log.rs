use serde::{Deserialize, Serialize};

use crate::types::Center;

/// Append-only center history for one identity, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionLog {
    centers: Vec<Center>,
}

impl PositionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, center: Center) {
        self.centers.push(center);
    }

    pub fn last(&self) -> Option<&Center> {
        self.centers.last()
    }

    /// The two most recent centers as `(older, newer)`.
    pub fn last_two(&self) -> Option<(&Center, &Center)> {
        match self.centers.as_slice() {
            [.., older, newer] => Some((older, newer)),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[Center] {
        &self.centers
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}
