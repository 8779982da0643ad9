//! Tests for `PipelineGraph`.

use proptest::prelude::*;

use crate::error::GraphError;
use crate::graph::PipelineGraph;
use crate::types::{ConfigValue, EdgeId, NodeKind, PipelineNode, PortDirection};

fn chain() -> (PipelineGraph, String, String, String) {
  let mut g = PipelineGraph::new();
  let src = g.create_node(NodeKind::FileSource);
  let enc = g.create_node(NodeKind::H264Encoder);
  let sink = g.create_node(NodeKind::RtmpSink);
  g.add_edge(&src, 0, &enc, 0).unwrap();
  g.add_edge(&enc, 0, &sink, 0).unwrap();
  (g, src, enc, sink)
}

#[test]
fn add_node_rejects_duplicate_id() {
  let mut g = PipelineGraph::new();
  g.add_node(PipelineNode::new("a", NodeKind::FileSource))
    .unwrap();
  let err = g
    .add_node(PipelineNode::new("a", NodeKind::DisplaySink))
    .unwrap_err();
  assert_eq!(err, GraphError::DuplicateId("a".to_string()));
  assert_eq!(g.len(), 1);
  assert_eq!(g.node("a").unwrap().kind(), NodeKind::FileSource);
}

#[test]
fn add_node_rejects_ids_unusable_as_element_names() {
  let mut g = PipelineGraph::new();
  for bad in ["my cam", "", "cam.1", "1cam", "x!y", "tee\"q"] {
    assert_eq!(
      g.add_node(PipelineNode::new(bad, NodeKind::CameraSource)),
      Err(GraphError::InvalidId(bad.to_string())),
      "{:?}",
      bad
    );
  }
  assert!(g.is_empty());
  for good in ["cam-2", "_scratch", "Front_Camera"] {
    g.add_node(PipelineNode::new(good, NodeKind::CameraSource))
      .unwrap();
  }
  assert_eq!(g.len(), 3);
}

#[test]
fn create_node_goes_through_add_node() {
  let mut g = PipelineGraph::new();
  g.add_node(PipelineNode::new("video_scale_1", NodeKind::DisplaySink))
    .unwrap();
  let id = g.create_node(NodeKind::VideoScale);
  assert_eq!(id, "video_scale_2");
  assert_eq!(g.node(&id).unwrap().kind(), NodeKind::VideoScale);
  assert_eq!(
    g.nodes().map(|n| n.id()).collect::<Vec<_>>(),
    vec!["video_scale_1", "video_scale_2"]
  );
}

#[test]
fn create_node_allocates_next_free_id() {
  let mut g = PipelineGraph::new();
  assert_eq!(g.create_node(NodeKind::FileSource), "file_source_1");
  assert_eq!(g.create_node(NodeKind::FileSource), "file_source_2");
  g.remove_node("file_source_1");
  assert_eq!(g.create_node(NodeKind::FileSource), "file_source_1");
  assert_eq!(g.create_node(NodeKind::DisplaySink), "display_sink_1");
}

#[test]
fn nodes_iterate_in_insertion_order() {
  let (g, src, enc, sink) = chain();
  let ids: Vec<_> = g.nodes().map(|n| n.id().to_string()).collect();
  assert_eq!(ids, vec![src, enc, sink]);
}

#[test]
fn add_edge_unknown_node() {
  let mut g = PipelineGraph::new();
  let src = g.create_node(NodeKind::CameraSource);
  assert_eq!(
    g.add_edge(&src, 0, "ghost", 0),
    Err(GraphError::UnknownNode("ghost".to_string()))
  );
  assert_eq!(
    g.add_edge("ghost", 0, &src, 0),
    Err(GraphError::UnknownNode("ghost".to_string()))
  );
  assert_eq!(g.edge_count(), 0);
}

#[test]
fn add_edge_out_of_range_port() {
  let mut g = PipelineGraph::new();
  let src = g.create_node(NodeKind::CameraSource);
  let sink = g.create_node(NodeKind::DisplaySink);
  match g.add_edge(&src, 1, &sink, 0) {
    Err(GraphError::OutOfRange {
      direction, index, ..
    }) => {
      assert_eq!(direction, PortDirection::Output);
      assert_eq!(index, 1);
    }
    other => panic!("expected OutOfRange, got {:?}", other),
  }
  // A sink has no output port at all.
  assert!(matches!(
    g.add_edge(&sink, 0, &src, 0),
    Err(GraphError::OutOfRange { .. })
  ));
  assert_eq!(g.edge_count(), 0);
}

#[test]
fn add_edge_incompatible_types() {
  let mut g = PipelineGraph::new();
  let src = g.create_node(NodeKind::FileSource);
  let rtmp = g.create_node(NodeKind::RtmpSink);
  match g.add_edge(&src, 0, &rtmp, 0) {
    Err(GraphError::IncompatiblePorts {
      source_type,
      target_type,
      ..
    }) => {
      assert_eq!(source_type, "video");
      assert_eq!(target_type, "h264");
    }
    other => panic!("expected IncompatiblePorts, got {:?}", other),
  }
  assert_eq!(g.edge_count(), 0);
}

#[test]
fn occupied_input_port_until_edge_removed() {
  let mut g = PipelineGraph::new();
  let a = g.create_node(NodeKind::FileSource);
  let b = g.create_node(NodeKind::CameraSource);
  let sink = g.create_node(NodeKind::DisplaySink);
  let first = g.add_edge(&a, 0, &sink, 0).unwrap();
  assert_eq!(
    g.add_edge(&b, 0, &sink, 0),
    Err(GraphError::PortOccupied {
      node_id: sink.clone(),
      port: 0,
      existing: first,
    })
  );
  assert_eq!(g.edge_count(), 1);
  assert!(g.remove_edge(first).is_some());
  let second = g.add_edge(&b, 0, &sink, 0).unwrap();
  assert_ne!(first, second);
  assert_eq!(g.input_edge(&sink, 0).unwrap().source_id, b);
}

#[test]
fn output_port_fans_out() {
  let mut g = PipelineGraph::new();
  let src = g.create_node(NodeKind::CameraSource);
  let d1 = g.create_node(NodeKind::DisplaySink);
  let d2 = g.create_node(NodeKind::DisplaySink);
  g.add_edge(&src, 0, &d1, 0).unwrap();
  g.add_edge(&src, 0, &d2, 0).unwrap();
  assert_eq!(g.outgoing(&src).len(), 2);
}

#[test]
fn remove_edge_is_idempotent() {
  let (mut g, ..) = chain();
  assert!(g.remove_edge(EdgeId(1)).is_some());
  assert!(g.remove_edge(EdgeId(1)).is_none());
  assert!(g.remove_edge(EdgeId(99)).is_none());
  assert_eq!(g.edge_count(), 1);
}

#[test]
fn remove_node_cascades_incident_edges_only() {
  let (mut g, src, enc, sink) = chain();
  let cam = g.create_node(NodeKind::CameraSource);
  let display = g.create_node(NodeKind::DisplaySink);
  g.add_edge(&cam, 0, &display, 0).unwrap();
  assert_eq!(g.edge_count(), 3);

  let removed = g.remove_node(&enc);
  assert_eq!(removed.len(), 2);
  assert_eq!(g.edge_count(), 1);
  assert!(!g.contains_node(&enc));
  assert!(g.contains_node(&src) && g.contains_node(&sink));
  assert_eq!(g.outgoing(&cam).len(), 1);
}

#[test]
fn remove_absent_node_is_noop() {
  let (mut g, ..) = chain();
  assert!(g.remove_node("ghost").is_empty());
  assert_eq!(g.len(), 3);
  assert_eq!(g.edge_count(), 2);
}

#[test]
fn set_config_through_graph() {
  let (mut g, src, ..) = chain();
  g.set_config(&src, "format", "mp4").unwrap();
  assert_eq!(
    g.node(&src).unwrap().get("format").and_then(ConfigValue::as_str),
    Some("mp4")
  );
  assert_eq!(
    g.set_config("ghost", "format", "mp4"),
    Err(GraphError::UnknownNode("ghost".to_string()))
  );
  assert!(g.set_config(&src, "format", "zip").is_err());
}

#[test]
fn topological_order_respects_edges() {
  let mut g = PipelineGraph::new();
  // Insert downstream nodes first so insertion order alone would be wrong.
  let sink = g.create_node(NodeKind::RtmpSink);
  let enc = g.create_node(NodeKind::H264Encoder);
  let src = g.create_node(NodeKind::CameraSource);
  g.add_edge(&enc, 0, &sink, 0).unwrap();
  g.add_edge(&src, 0, &enc, 0).unwrap();
  assert_eq!(g.topological_order().unwrap(), vec![src, enc, sink]);
}

#[test]
fn topological_order_breaks_ties_by_insertion() {
  let mut g = PipelineGraph::new();
  let a = g.create_node(NodeKind::CameraSource);
  let b = g.create_node(NodeKind::FileSource);
  let c = g.create_node(NodeKind::DisplaySink);
  assert_eq!(g.topological_order().unwrap(), vec![a, b, c]);
}

#[test]
fn cycle_is_reported_with_edge_on_cycle() {
  let mut g = PipelineGraph::new();
  let sink = g.create_node(NodeKind::DisplaySink);
  let a = g.create_node(NodeKind::VideoScale);
  let b = g.create_node(NodeKind::VideoScale);
  let ab = g.add_edge(&a, 0, &b, 0).unwrap();
  let ba = g.add_edge(&b, 0, &a, 0).unwrap();
  // The sink hangs off the cycle and is inserted first, so it is the first
  // unsorted node; the reported edge must still lie on the cycle itself.
  g.add_edge(&b, 0, &sink, 0).unwrap();

  match g.topological_order() {
    Err(GraphError::Cycle {
      edge,
      source_id,
      target_id,
    }) => {
      assert!(edge == ab || edge == ba, "edge {} not on cycle", edge);
      assert_ne!(source_id, sink);
      assert_ne!(target_id, sink);
    }
    other => panic!("expected Cycle, got {:?}", other),
  }
}

#[test]
fn breaking_the_cycle_restores_order() {
  let mut g = PipelineGraph::new();
  let cam = g.create_node(NodeKind::CameraSource);
  let a = g.create_node(NodeKind::VideoScale);
  let b = g.create_node(NodeKind::VideoScale);
  g.add_edge(&a, 0, &b, 0).unwrap();
  let back = g.add_edge(&b, 0, &a, 0).unwrap();
  assert!(g.topological_order().is_err());

  g.remove_edge(back);
  g.add_edge(&cam, 0, &a, 0).unwrap();
  assert_eq!(g.topological_order().unwrap(), vec![cam, a, b]);
}

/// Builds a graph from generated kind indices and edge attempts, ignoring
/// rejected edges.
fn arbitrary_graph(kinds: &[usize], attempts: &[(usize, usize)]) -> PipelineGraph {
  let mut g = PipelineGraph::new();
  let ids: Vec<String> = kinds
    .iter()
    .map(|k| g.create_node(NodeKind::ALL[k % NodeKind::ALL.len()]))
    .collect();
  for (s, t) in attempts {
    let _ = g.add_edge(&ids[s % ids.len()], 0, &ids[t % ids.len()], 0);
  }
  g
}

proptest! {
  #[test]
  fn rejected_edges_leave_edge_set_unchanged(
    kinds in prop::collection::vec(0usize..7, 1..8),
    attempts in prop::collection::vec((0usize..8, 0usize..8), 0..16),
  ) {
    let mut g = PipelineGraph::new();
    let ids: Vec<String> = kinds
      .iter()
      .map(|k| g.create_node(NodeKind::ALL[*k]))
      .collect();
    for (s, t) in attempts {
      let before: Vec<_> = g.edges().cloned().collect();
      let result = g.add_edge(&ids[s % ids.len()], 0, &ids[t % ids.len()], 0);
      let after: Vec<_> = g.edges().cloned().collect();
      match result {
        Ok(id) => {
          prop_assert_eq!(after.len(), before.len() + 1);
          prop_assert!(after.iter().any(|e| e.id == id));
        }
        Err(_) => prop_assert_eq!(after, before),
      }
    }
  }

  #[test]
  fn every_accepted_edge_is_type_compatible_with_fan_in_one(
    kinds in prop::collection::vec(0usize..7, 1..8),
    attempts in prop::collection::vec((0usize..8, 0usize..8), 0..16),
  ) {
    let g = arbitrary_graph(&kinds, &attempts);
    for e in g.edges() {
      let out = g.node(&e.source_id).unwrap().port(PortDirection::Output, e.source_port).unwrap();
      let inp = g.node(&e.target_id).unwrap().port(PortDirection::Input, e.target_port).unwrap();
      prop_assert_eq!(out.data_type, inp.data_type);
      prop_assert_eq!(g.incoming(&e.target_id).len(), 1);
    }
  }

  #[test]
  fn remove_node_drops_exactly_incident_edges(
    kinds in prop::collection::vec(0usize..7, 1..8),
    attempts in prop::collection::vec((0usize..8, 0usize..8), 0..16),
    victim in 0usize..8,
  ) {
    let mut g = arbitrary_graph(&kinds, &attempts);
    let id = g.nodes().nth(victim % g.len()).unwrap().id().to_string();
    let survivors: Vec<_> = g.edges().filter(|e| !e.touches(&id)).cloned().collect();
    let expected_removed = g.edge_count() - survivors.len();
    let removed = g.remove_node(&id);
    prop_assert_eq!(removed.len(), expected_removed);
    prop_assert_eq!(g.edges().cloned().collect::<Vec<_>>(), survivors);
  }

  #[test]
  fn topological_order_points_every_edge_forward(
    kinds in prop::collection::vec(0usize..7, 1..8),
    attempts in prop::collection::vec((0usize..8, 0usize..8), 0..16),
  ) {
    let g = arbitrary_graph(&kinds, &attempts);
    if let Ok(order) = g.topological_order() {
      prop_assert_eq!(order.len(), g.len());
      let pos = |id: &str| order.iter().position(|n| n == id).unwrap();
      for e in g.edges() {
        prop_assert!(pos(&e.source_id) < pos(&e.target_id));
      }
      prop_assert_eq!(g.topological_order().unwrap(), order);
    }
  }
}
