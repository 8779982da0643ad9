//! Integration snippets: templated expansions of a compiled pipeline string.
//!
//! Snippets are presentation only; nothing here feeds back into the graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A snippet flavour included in exported documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetKind {
  GstLaunch,
  Python,
  Cpp,
  C,
}

impl SnippetKind {
  pub const ALL: [SnippetKind; 4] = [
    SnippetKind::GstLaunch,
    SnippetKind::Python,
    SnippetKind::Cpp,
    SnippetKind::C,
  ];

  /// Key under which the snippet is stored in a document.
  pub fn name(self) -> &'static str {
    match self {
      SnippetKind::GstLaunch => "gst_launch",
      SnippetKind::Python => "python",
      SnippetKind::Cpp => "cpp",
      SnippetKind::C => "c",
    }
  }

  /// Expands the template for `pipeline`.
  pub fn render(self, pipeline: &str) -> String {
    let literal = string_literal(pipeline);
    match self {
      SnippetKind::GstLaunch => format!("gst-launch-1.0 {}", pipeline),
      SnippetKind::Python => format!(
        "import gi\n\
         gi.require_version('Gst', '1.0')\n\
         from gi.repository import Gst\n\
         \n\
         Gst.init(None)\n\
         \n\
         pipeline_str = {}\n\
         pipeline = Gst.parse_launch(pipeline_str)\n\
         pipeline.set_state(Gst.State.PLAYING)\n",
        literal
      ),
      SnippetKind::Cpp => format!(
        "#include <gst/gst.h>\n\
         \n\
         int main(int argc, char* argv[]) {{\n\
         \x20   gst_init(&argc, &argv);\n\
         \n\
         \x20   GstElement* pipeline = gst_parse_launch({}, nullptr);\n\
         \x20   gst_element_set_state(pipeline, GST_STATE_PLAYING);\n\
         \n\
         \x20   return 0;\n\
         }}\n",
        literal
      ),
      SnippetKind::C => format!(
        "#include <gst/gst.h>\n\
         \n\
         int main(int argc, char *argv[]) {{\n\
         \x20   GError *error = NULL;\n\
         \x20   gst_init(&argc, &argv);\n\
         \n\
         \x20   GstElement *pipeline = gst_parse_launch({}, &error);\n\
         \x20   if (pipeline == NULL) {{\n\
         \x20       g_printerr(\"parse error: %s\\n\", error->message);\n\
         \x20       g_clear_error(&error);\n\
         \x20       return 1;\n\
         \x20   }}\n\
         \n\
         \x20   gst_element_set_state(pipeline, GST_STATE_PLAYING);\n\
         \x20   GstBus *bus = gst_element_get_bus(pipeline);\n\
         \x20   GstMessage *msg = gst_bus_timed_pop_filtered(\n\
         \x20       bus, GST_CLOCK_TIME_NONE, GST_MESSAGE_ERROR | GST_MESSAGE_EOS);\n\
         \n\
         \x20   if (msg != NULL)\n\
         \x20       gst_message_unref(msg);\n\
         \x20   gst_object_unref(bus);\n\
         \x20   gst_element_set_state(pipeline, GST_STATE_NULL);\n\
         \x20   gst_object_unref(pipeline);\n\
         \x20   return 0;\n\
         }}\n",
        literal
      ),
    }
  }
}

impl fmt::Display for SnippetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for SnippetKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    SnippetKind::ALL
      .iter()
      .copied()
      .find(|k| k.name() == s)
      .ok_or_else(|| {
        let names: Vec<_> = SnippetKind::ALL.iter().map(|k| k.name()).collect();
        format!("unknown snippet '{}' (expected one of: {})", s, names.join(", "))
      })
  }
}

/// Double-quoted literal valid in Python, C and C++.
fn string_literal(s: &str) -> String {
  let mut out = String::with_capacity(s.len() + 2);
  out.push('"');
  for c in s.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\t' => out.push_str("\\t"),
      _ => out.push(c),
    }
  }
  out.push('"');
  out
}
