//! Ports and the connection compatibility rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DataType;

/// Direction of a port relative to its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
  Input,
  Output,
}

impl fmt::Display for PortDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PortDirection::Input => write!(f, "input"),
      PortDirection::Output => write!(f, "output"),
    }
  }
}

/// A typed attachment point on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
  pub direction: PortDirection,
  pub index: usize,
  pub data_type: DataType,
}

impl Port {
  pub fn input(index: usize, data_type: DataType) -> Self {
    Self {
      direction: PortDirection::Input,
      index,
      data_type,
    }
  }

  pub fn output(index: usize, data_type: DataType) -> Self {
    Self {
      direction: PortDirection::Output,
      index,
      data_type,
    }
  }
}

/// Returns true if `output` may feed `input`.
///
/// This is the only check gating edge insertion.
pub fn compatible(output: &Port, input: &Port) -> bool {
  output.direction == PortDirection::Output
    && input.direction == PortDirection::Input
    && output.data_type.id == input.data_type.id
}
