//! Data types carried by ports.

use std::fmt;

/// Compatibility key shared by connectable ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType {
  pub id: &'static str,
  pub label: &'static str,
}

impl DataType {
  /// Video stream as produced by sources and consumed by encoders and display sinks.
  pub const VIDEO: DataType = DataType {
    id: "video",
    label: "Video stream",
  };

  /// Encoded H.264 elementary stream.
  pub const H264: DataType = DataType {
    id: "h264",
    label: "H.264 elementary stream",
  };

  /// All registered data types.
  pub const ALL: &'static [DataType] = &[DataType::VIDEO, DataType::H264];

  /// Looks up a registered data type by id.
  pub fn lookup(id: &str) -> Option<DataType> {
    Self::ALL.iter().copied().find(|t| t.id == id)
  }
}

impl fmt::Display for DataType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id)
  }
}
