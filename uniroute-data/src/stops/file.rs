//! Stop source backed by a local JSON file.
//!
//! The file uses the stop API wire format. Each entry may additionally carry
//! a `stopTimes` array, which [`FileStopSource::stop_times`] serves. The file
//! is re-read on every call so edits are picked up on retry.

use std::io;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use uniroute_core::{Stop, StopId, StopSource, StopSourceError, StopTime};

use super::dto::{StopEntry, decode_stops};

/// Stop source reading a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStopSource {
    path: Utf8PathBuf,
}

impl FileStopSource {
    /// Read stops from `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the source reads.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<StopEntry>, StopSourceError> {
        let path = self.path.clone();
        let body = tokio::task::spawn_blocking(move || read_utf8(&path))
            .await
            .map_err(|err| self.io_error(&io::Error::other(err)))?
            .map_err(|err| self.io_error(&err))?;
        decode_stops(&body)
    }

    fn io_error(&self, error: &io::Error) -> StopSourceError {
        if error.kind() == io::ErrorKind::NotFound {
            return StopSourceError::NotFound {
                what: format!("stop file {}", self.path),
            };
        }
        StopSourceError::Io {
            path: self.path.to_string(),
            message: error.to_string(),
        }
    }
}

/// Read `path` through a capability on its parent directory.
fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("stop file path should include a file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}

#[async_trait]
impl StopSource for FileStopSource {
    async fn list_stops(&self) -> Result<Vec<Stop>, StopSourceError> {
        Ok(self.load().await?.into_iter().map(|entry| entry.stop).collect())
    }

    async fn stop_times(&self, stop_id: &StopId) -> Result<Vec<StopTime>, StopSourceError> {
        self.load()
            .await?
            .into_iter()
            .find(|entry| entry.stop.id == *stop_id)
            .map(|entry| entry.times)
            .ok_or_else(|| StopSourceError::NotFound {
                what: format!("stop {stop_id}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[fixture]
    fn stop_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(
            br#"[
                {"Id": 1, "Name": "Paulista", "Latitude": -23.560, "Longitude": -46.655,
                 "StopTimes": [{"Id": 9, "RouteName": "875A", "ArrivalTime": "07:50"}]},
                {"Id": 2, "Name": "Ibirapuera", "Latitude": -23.600, "Longitude": -46.700}
            ]"#,
        )
        .expect("write stops");
        file
    }

    fn source_for(file: &NamedTempFile) -> FileStopSource {
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).expect("utf-8 temp path");
        FileStopSource::new(path)
    }

    #[rstest]
    #[tokio::test]
    async fn lists_stops_in_file_order(stop_file: NamedTempFile) {
        let stops = source_for(&stop_file).list_stops().await.expect("stops load");

        let names: Vec<_> = stops.iter().map(Stop::display_name).collect();
        assert_eq!(names, vec!["Paulista", "Ibirapuera"]);
    }

    #[rstest]
    #[tokio::test]
    async fn serves_embedded_stop_times(stop_file: NamedTempFile) {
        let source = source_for(&stop_file);

        let times = source
            .stop_times(&StopId::from(1_u64))
            .await
            .expect("times load");
        let none = source
            .stop_times(&StopId::from(2_u64))
            .await
            .expect("times load");

        assert_eq!(times.len(), 1);
        assert_eq!(times[0].route_name.as_deref(), Some("875A"));
        assert!(none.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_stop_is_not_found(stop_file: NamedTempFile) {
        let err = source_for(&stop_file)
            .stop_times(&StopId::from(99_u64))
            .await
            .expect_err("stop is missing");

        assert!(matches!(err, StopSourceError::NotFound { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json")).expect("utf-8 path");

        let err = FileStopSource::new(path)
            .list_stops()
            .await
            .expect_err("file is missing");

        assert!(matches!(err, StopSourceError::NotFound { .. }));
    }
}
