//! Tests for `Segment` rendering.

use super::{FormatStage, Segment, SizeLimit};

fn seg(elements: &[&str]) -> Segment {
  Segment::new(elements.iter().map(|s| s.to_string()).collect())
}

#[test]
fn joins_elements_with_links() {
  let s = seg(&["flvmux streamable=true", "rtmpsink location=rtmp://h/live"]);
  assert_eq!(
    s.to_string(),
    "flvmux streamable=true ! rtmpsink location=rtmp://h/live"
  );
}

#[test]
fn blocksize_attaches_to_first_element() {
  let s = seg(&["filesrc location=clip.mp4"]).with_size_limit(SizeLimit::Blocksize(65536));
  assert_eq!(s.render(true), "filesrc location=clip.mp4 blocksize=65536");
  assert_eq!(s.render(false), "filesrc location=clip.mp4");
}

#[test]
fn queue_prefixes_segment() {
  let s = seg(&["x264enc bitrate=1000"]).with_size_limit(SizeLimit::Queue(2048));
  assert_eq!(s.render(true), "queue max-size-bytes=2048 ! x264enc bitrate=1000");
  assert_eq!(s.render(false), "x264enc bitrate=1000");
}

#[test]
fn format_stage_is_not_part_of_own_text() {
  let s = seg(&["filesrc location=a.mkv"]).with_format(FormatStage::Container("mkv".into()));
  assert_eq!(s.to_string(), "filesrc location=a.mkv");
}

#[test]
fn quote_value_leaves_plain_paths() {
  assert_eq!(super::quote_value("/media/clip.mp4"), "/media/clip.mp4");
}

#[test]
fn quote_value_wraps_spaces_and_escapes_quotes() {
  assert_eq!(super::quote_value("/my clips/a.mp4"), "\"/my clips/a.mp4\"");
  assert_eq!(super::quote_value("say \"hi\""), "\"say \\\"hi\\\"\"");
}
