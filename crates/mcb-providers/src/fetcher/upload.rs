//! Upload-bundle path validation.

use mcb_domain::entities::{FileOrigin, WorkingFile};
use mcb_domain::error::{Error, Result};

/// Validate and materialize an uploaded bundle into `WorkingFile`s.
///
/// Rejects any filename containing a `..` path segment, since the upload is
/// written into a per-job scratch area under the supplied filenames and must
/// not be able to escape it.
///
/// # Errors
/// Returns [`Error::InputValidation`] on the first filename containing a
/// `..` segment.
pub fn validate_upload_paths(files: Vec<(String, Vec<u8>)>) -> Result<Vec<WorkingFile>> {
    files
        .into_iter()
        .map(|(path, bytes)| {
            if has_parent_segment(&path) {
                return Err(Error::input_validation(format!(
                    "uploaded filename escapes the working set: {path}"
                )));
            }
            Ok(WorkingFile::new(path, bytes, FileOrigin::Uploaded))
        })
        .collect()
}

fn has_parent_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_nested_relative_path() {
        let result = validate_upload_paths(vec![("src/app.py".to_owned(), b"x".to_vec())]);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_a_traversal_attempt() {
        let result = validate_upload_paths(vec![("../../etc/passwd".to_owned(), b"x".to_vec())]);
        assert!(matches!(result, Err(Error::InputValidation { .. })));
    }

    #[test]
    fn rejects_a_traversal_attempt_mid_path() {
        let result = validate_upload_paths(vec![("src/../../secrets.env".to_owned(), b"x".to_vec())]);
        assert!(result.is_err());
    }
}
