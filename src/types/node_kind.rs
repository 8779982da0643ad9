//! Registry of node kinds: role, port types and configuration schema per kind.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::{ConfigValue, Constraint, FieldSpec};
use super::{DataType, PortDirection};
use crate::error::GraphError;
use crate::formats::{AUTO_DETECT, CONTAINER_FORMATS};

static RTSP_URL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^rtsps?://[^\s/]+(/\S*)?$").expect("valid RTSP pattern"));

static RTMP_URL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^rtmps?://[^\s/]+(/\S*)?$").expect("valid RTMP pattern"));

const PRESETS: &[&str] = &[
  "ultrafast",
  "superfast",
  "veryfast",
  "faster",
  "fast",
  "medium",
  "slow",
  "slower",
  "veryslow",
];

const CAMERA_DEVICES: &[&str] = &["/dev/video0", "/dev/video1", "/dev/video2"];

const fn text(s: &'static str) -> ConfigValue {
  ConfigValue::Text(Cow::Borrowed(s))
}

static FILE_SOURCE_FIELDS: [FieldSpec; 7] = [
  FieldSpec::new(
    "file_path",
    "File Path",
    Constraint::Text,
    text("/path/to/video.mp4"),
  ),
  FieldSpec::new(
    "loop",
    "Loop playback",
    Constraint::Flag,
    ConfigValue::Bool(true),
  ),
  FieldSpec::new(
    "start_position",
    "Start Position (seconds)",
    Constraint::Number {
      min: 0.0,
      max: 999999.0,
    },
    ConfigValue::Float(0.0),
  ),
  FieldSpec::new(
    "duration",
    "Duration (seconds, 0=unlimited)",
    Constraint::Number {
      min: 0.0,
      max: 999999.0,
    },
    ConfigValue::Float(0.0),
  ),
  FieldSpec::new(
    "buffer_size_kb",
    "Buffer Size (KB)",
    Constraint::Integer { min: 0, max: 10240 },
    ConfigValue::Int(64),
  ),
  FieldSpec::new(
    "format",
    "Format",
    Constraint::Choice(CONTAINER_FORMATS),
    text(AUTO_DETECT),
  ),
  FieldSpec::new(
    "typefind",
    "Enable typefind",
    Constraint::Flag,
    ConfigValue::Bool(true),
  ),
];

static RTSP_SOURCE_FIELDS: [FieldSpec; 2] = [
  FieldSpec::new(
    "location",
    "RTSP URL",
    Constraint::Url {
      pattern: &RTSP_URL,
      hint: "rtsp://",
    },
    text("rtsp://192.168.1.100:554/stream"),
  ),
  FieldSpec::new(
    "latency_ms",
    "Latency (ms)",
    Constraint::Integer { min: 0, max: 10000 },
    ConfigValue::Int(200),
  ),
];

static CAMERA_SOURCE_FIELDS: [FieldSpec; 1] = [FieldSpec::new(
  "device",
  "Camera Device",
  Constraint::Choice(CAMERA_DEVICES),
  text("/dev/video0"),
)];

static H264_ENCODER_FIELDS: [FieldSpec; 3] = [
  FieldSpec::new(
    "bitrate",
    "Bitrate (kbps)",
    Constraint::Integer { min: 1, max: 100000 },
    ConfigValue::Int(1000),
  ),
  FieldSpec::new(
    "preset",
    "Preset",
    Constraint::Choice(PRESETS),
    text("fast"),
  ),
  FieldSpec::new(
    "queue_size_kb",
    "Queue Size (KB, 0=none)",
    Constraint::Integer { min: 0, max: 10240 },
    ConfigValue::Int(0),
  ),
];

static VIDEO_SCALE_FIELDS: [FieldSpec; 3] = [
  FieldSpec::new(
    "width",
    "Width (px)",
    Constraint::Integer { min: 16, max: 7680 },
    ConfigValue::Int(1280),
  ),
  FieldSpec::new(
    "height",
    "Height (px)",
    Constraint::Integer { min: 16, max: 4320 },
    ConfigValue::Int(720),
  ),
  FieldSpec::new(
    "queue_size_kb",
    "Queue Size (KB, 0=none)",
    Constraint::Integer { min: 0, max: 10240 },
    ConfigValue::Int(0),
  ),
];

static RTMP_SINK_FIELDS: [FieldSpec; 2] = [
  FieldSpec::new(
    "location",
    "RTMP URL",
    Constraint::Url {
      pattern: &RTMP_URL,
      hint: "rtmp://",
    },
    text("rtmp://localhost:1935/live/stream"),
  ),
  FieldSpec::new(
    "queue_size_kb",
    "Queue Size (KB, 0=none)",
    Constraint::Integer { min: 0, max: 10240 },
    ConfigValue::Int(0),
  ),
];

static DISPLAY_SINK_FIELDS: [FieldSpec; 1] = [FieldSpec::new(
  "sync",
  "Sync to clock",
  Constraint::Flag,
  ConfigValue::Bool(true),
)];

/// Position of a node kind in a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Source,
  Filter,
  Sink,
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Role::Source => write!(f, "source"),
      Role::Filter => write!(f, "filter"),
      Role::Sink => write!(f, "sink"),
    }
  }
}

/// Every node kind the designer can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
  FileSource,
  RtspSource,
  CameraSource,
  VideoScale,
  H264Encoder,
  RtmpSink,
  DisplaySink,
}

impl NodeKind {
  pub const ALL: [NodeKind; 7] = [
    NodeKind::FileSource,
    NodeKind::RtspSource,
    NodeKind::CameraSource,
    NodeKind::VideoScale,
    NodeKind::H264Encoder,
    NodeKind::RtmpSink,
    NodeKind::DisplaySink,
  ];

  /// Identifier used in documents and generated node ids.
  pub fn as_str(self) -> &'static str {
    match self {
      NodeKind::FileSource => "file_source",
      NodeKind::RtspSource => "rtsp_source",
      NodeKind::CameraSource => "camera_source",
      NodeKind::VideoScale => "video_scale",
      NodeKind::H264Encoder => "h264_encoder",
      NodeKind::RtmpSink => "rtmp_sink",
      NodeKind::DisplaySink => "display_sink",
    }
  }

  /// Caption shown by editors.
  pub fn caption(self) -> &'static str {
    match self {
      NodeKind::FileSource => "File Source",
      NodeKind::RtspSource => "RTSP Source",
      NodeKind::CameraSource => "Camera Source",
      NodeKind::VideoScale => "Video Scale",
      NodeKind::H264Encoder => "H.264 Encoder",
      NodeKind::RtmpSink => "RTMP Sink",
      NodeKind::DisplaySink => "Display Sink",
    }
  }

  pub fn role(self) -> Role {
    match self {
      NodeKind::FileSource | NodeKind::RtspSource | NodeKind::CameraSource => Role::Source,
      NodeKind::VideoScale | NodeKind::H264Encoder => Role::Filter,
      NodeKind::RtmpSink | NodeKind::DisplaySink => Role::Sink,
    }
  }

  /// Port data types for `direction`, indexed by port.
  pub fn port_types(self, direction: PortDirection) -> &'static [DataType] {
    match (self, direction) {
      (NodeKind::H264Encoder, PortDirection::Output) | (NodeKind::RtmpSink, PortDirection::Input) => {
        &[DataType::H264]
      }
      (_, PortDirection::Input) if self.role() == Role::Source => &[],
      (_, PortDirection::Output) if self.role() == Role::Sink => &[],
      _ => &[DataType::VIDEO],
    }
  }

  /// Declared configuration fields, in display order.
  pub fn fields(self) -> &'static [FieldSpec] {
    match self {
      NodeKind::FileSource => &FILE_SOURCE_FIELDS,
      NodeKind::RtspSource => &RTSP_SOURCE_FIELDS,
      NodeKind::CameraSource => &CAMERA_SOURCE_FIELDS,
      NodeKind::VideoScale => &VIDEO_SCALE_FIELDS,
      NodeKind::H264Encoder => &H264_ENCODER_FIELDS,
      NodeKind::RtmpSink => &RTMP_SINK_FIELDS,
      NodeKind::DisplaySink => &DISPLAY_SINK_FIELDS,
    }
  }

  pub fn field(self, key: &str) -> Option<&'static FieldSpec> {
    self.fields().iter().find(|f| f.key == key)
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for NodeKind {
  type Err = GraphError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    NodeKind::ALL
      .iter()
      .copied()
      .find(|k| k.as_str() == s)
      .ok_or_else(|| GraphError::UnknownKind(s.to_string()))
  }
}
