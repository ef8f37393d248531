//! Seam between the pose compositor and whatever issues draw calls.

use crate::Mat4;

/// Receives matrices right before a draw call.
pub trait UniformSink {
    fn set_matrix(&mut self, name: &str, value: &Mat4);

    fn set_matrix_array(&mut self, name: &str, values: &[Mat4]);
}

/// Sink that keeps every upload in memory. Used for headless runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub matrices: Vec<(String, Mat4)>,
    pub arrays: Vec<(String, Vec<Mat4>)>,
}

impl RecordingSink {
    /// Most recent array pushed under `name`.
    pub fn last_array(&self, name: &str) -> Option<&[Mat4]> {
        self.arrays
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }
}

impl UniformSink for RecordingSink {
    fn set_matrix(&mut self, name: &str, value: &Mat4) {
        self.matrices.push((name.to_owned(), *value));
    }

    fn set_matrix_array(&mut self, name: &str, values: &[Mat4]) {
        self.arrays.push((name.to_owned(), values.to_vec()));
    }
}
