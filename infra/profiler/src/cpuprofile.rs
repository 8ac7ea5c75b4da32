//! Chrome DevTools `.cpuprofile` documents.
//!
//! The format is a call tree (`nodes`) plus a sample timeline (`samples`,
//! `timeDeltas`). It loads in Chrome DevTools, VS Code and speedscope.

use crate::error::{ProfilerError, ProfilerErrorExt};
use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

const ROOT_ID: u32 = 1;
const ROOT_NAME: &str = "(root)";
const UNNAMED_THREAD: &str = "(unnamed thread)";
const SCRIPT_ID: &str = "0";
const UNKNOWN_POSITION: i64 = -1;
const MICROS_PER_SECOND: i64 = 1_000_000;

/// One resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    pub function: String,
    pub file: Option<String>,
    /// 1-based source line.
    pub line: Option<u32>,
}

/// A distinct stack observed `count` times on `thread`.
#[derive(Debug, Clone)]
pub struct StackSample {
    pub thread: String,
    /// Outermost frame first.
    pub frames: Vec<Frame>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    pub function_name: String,
    pub script_id: String,
    pub url: String,
    /// 0-based, `-1` when unknown.
    pub line_number: i64,
    pub column_number: i64,
}

impl CallFrame {
    fn named(name: &str) -> Self {
        Self {
            function_name: name.to_owned(),
            script_id: SCRIPT_ID.to_owned(),
            url: String::new(),
            line_number: UNKNOWN_POSITION,
            column_number: UNKNOWN_POSITION,
        }
    }
}

impl From<&Frame> for CallFrame {
    fn from(frame: &Frame) -> Self {
        Self {
            function_name: frame.function.clone(),
            script_id: SCRIPT_ID.to_owned(),
            url: frame.file.clone().unwrap_or_default(),
            line_number: frame.line.map_or(UNKNOWN_POSITION, |line| i64::from(line) - 1),
            column_number: UNKNOWN_POSITION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNode {
    pub id: u32,
    pub call_frame: CallFrame,
    /// Samples whose innermost frame is this node.
    pub hit_count: u64,
    pub children: Vec<u32>,
}

/// A complete `.cpuprofile` document. Times are microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuProfile {
    pub nodes: Vec<ProfileNode>,
    pub start_time: i64,
    pub end_time: i64,
    pub samples: Vec<u32>,
    pub time_deltas: Vec<i64>,
}

impl CpuProfile {
    /// Builds the call tree and timeline from aggregated stacks.
    ///
    /// Each thread becomes a child of `(root)` and its stacks hang below it.
    /// Aggregated stacks carry no per-sample timestamps, so the timeline lists
    /// each leaf `count` times spaced by the sampling interval.
    #[must_use]
    pub fn from_samples(
        samples: impl IntoIterator<Item = StackSample>,
        start: SystemTime,
        duration: Duration,
        frequency: i32,
    ) -> Self {
        let mut tree = CallTree::new();
        let mut leaves: Vec<(u32, u64)> = samples
            .into_iter()
            .filter(|sample| sample.count > 0)
            .map(|sample| {
                let thread =
                    if sample.thread.is_empty() { UNNAMED_THREAD } else { sample.thread.as_str() };
                let mut node = tree.child(ROOT_ID, CallFrame::named(thread));
                for frame in &sample.frames {
                    node = tree.child(node, CallFrame::from(frame));
                }
                tree.hit(node, sample.count);
                (node, sample.count)
            })
            .collect();
        leaves.sort_unstable();

        let interval = MICROS_PER_SECOND / i64::from(frequency.max(1));
        let samples: Vec<u32> = leaves
            .iter()
            .flat_map(|&(node, count)| {
                std::iter::repeat_n(node, usize::try_from(count).unwrap_or(usize::MAX))
            })
            .collect();
        let time_deltas = vec![interval; samples.len()];

        let start_time = DateTime::<Utc>::from(start).timestamp_micros();
        let elapsed = i64::try_from(duration.as_micros()).unwrap_or(i64::MAX);

        Self {
            nodes: tree.nodes,
            start_time,
            end_time: start_time.saturating_add(elapsed),
            samples,
            time_deltas,
        }
    }

    /// Writes the profile as JSON to a new file.
    ///
    /// # Errors
    /// Returns [`ProfilerError::Io`] if `path` already exists or cannot be
    /// written, [`ProfilerError::Serialize`] if encoding fails.
    pub fn write_to(&self, path: &Path) -> Result<(), ProfilerError> {
        let file = File::create_new(path).context(format!("Creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).context("Encoding CPU profile")?;
        writer.flush().context(format!("Flushing {}", path.display()))
    }
}

/// Interns call frames per parent so identical paths share nodes.
struct CallTree {
    nodes: Vec<ProfileNode>,
    index: FxHashMap<(u32, CallFrame), u32>,
}

impl CallTree {
    fn new() -> Self {
        let root = ProfileNode {
            id: ROOT_ID,
            call_frame: CallFrame::named(ROOT_NAME),
            hit_count: 0,
            children: Vec::new(),
        };
        Self { nodes: vec![root], index: FxHashMap::default() }
    }

    fn child(&mut self, parent: u32, frame: CallFrame) -> u32 {
        match self.index.entry((parent, frame)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = u32::try_from(self.nodes.len() + 1).unwrap_or(u32::MAX);
                let call_frame = entry.key().1.clone();
                self.nodes.push(ProfileNode { id, call_frame, hit_count: 0, children: Vec::new() });
                if let Some(parent) = node_at(&mut self.nodes, parent) {
                    parent.children.push(id);
                }
                *entry.insert(id)
            },
        }
    }

    fn hit(&mut self, id: u32, count: u64) {
        if let Some(node) = node_at(&mut self.nodes, id) {
            node.hit_count += count;
        }
    }
}

/// Node ids are 1-based positions in `nodes`.
fn node_at(nodes: &mut [ProfileNode], id: u32) -> Option<&mut ProfileNode> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    nodes.get_mut(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn frame(function: &str, line: Option<u32>) -> Frame {
        Frame { function: function.to_owned(), file: Some("src/lib.rs".to_owned()), line }
    }

    fn stack(thread: &str, functions: &[&str], count: u64) -> StackSample {
        StackSample {
            thread: thread.to_owned(),
            frames: functions.iter().map(|f| frame(f, Some(10))).collect(),
            count,
        }
    }

    fn node<'a>(profile: &'a CpuProfile, name: &str) -> Vec<&'a ProfileNode> {
        profile.nodes.iter().filter(|n| n.call_frame.function_name == name).collect()
    }

    fn build(samples: Vec<StackSample>) -> CpuProfile {
        CpuProfile::from_samples(samples, SystemTime::UNIX_EPOCH, Duration::from_millis(250), 1000)
    }

    #[test]
    fn shared_prefixes_share_nodes() {
        let profile = build(vec![
            stack("main", &["main", "serve", "cloning"], 3),
            stack("main", &["main", "serve", "streaming"], 1),
        ]);

        assert_eq!(node(&profile, "main").len(), 2, "thread node and function node");
        assert_eq!(node(&profile, "serve").len(), 1);
        let serve = node(&profile, "serve")[0];
        assert_eq!(serve.children.len(), 2);
        assert_eq!(serve.hit_count, 0);
        assert_eq!(node(&profile, "cloning")[0].hit_count, 3);
        assert_eq!(node(&profile, "streaming")[0].hit_count, 1);
    }

    #[test]
    fn threads_get_separate_subtrees() {
        let profile = build(vec![stack("a", &["work"], 1), stack("b", &["work"], 1)]);

        assert_eq!(profile.nodes[0].call_frame.function_name, ROOT_NAME);
        assert_eq!(profile.nodes[0].children.len(), 2);
        assert_eq!(node(&profile, "work").len(), 2);
    }

    #[test]
    fn timeline_matches_hit_counts() {
        let profile = build(vec![
            stack("main", &["a"], 2),
            stack("main", &["b"], 5),
            stack("main", &["ignored"], 0),
        ]);

        let hits: u64 = profile.nodes.iter().map(|n| n.hit_count).sum();
        assert_eq!(usize::try_from(hits).unwrap(), profile.samples.len());
        assert_eq!(profile.samples.len(), 7);
        assert_eq!(profile.time_deltas, vec![1000; 7]);
        assert!(node(&profile, "ignored").is_empty());
        assert_eq!(profile.end_time - profile.start_time, 250_000);
    }

    #[test]
    fn every_node_has_exactly_one_parent() {
        let profile = build(vec![
            stack("main", &["x", "y", "z"], 1),
            stack("main", &["x", "q"], 1),
            stack("", &["x"], 1),
        ]);

        let mut seen = HashSet::new();
        for child in profile.nodes.iter().flat_map(|n| n.children.iter()) {
            assert!(seen.insert(*child), "node {child} listed twice");
        }
        let ids: HashSet<u32> = profile.nodes.iter().map(|n| n.id).filter(|&id| id != ROOT_ID).collect();
        assert_eq!(seen, ids);
        assert_eq!(node(&profile, UNNAMED_THREAD).len(), 1);
    }

    #[test]
    fn line_numbers_become_zero_based() {
        let frames = [frame("known", Some(42)), frame("unknown", None)];
        let known = CallFrame::from(&frames[0]);
        let unknown = CallFrame::from(&frames[1]);

        assert_eq!(known.line_number, 41);
        assert_eq!(unknown.line_number, UNKNOWN_POSITION);
        assert_eq!(known.url, "src/lib.rs");
    }

    #[test]
    fn serializes_with_devtools_keys() {
        let profile = build(vec![stack("main", &["a"], 1)]);
        let json = serde_json::to_value(&profile).unwrap();

        for key in ["nodes", "startTime", "endTime", "samples", "timeDeltas"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        let root = &json["nodes"][0];
        assert_eq!(root["callFrame"]["functionName"], ROOT_NAME);
        assert!(root.get("hitCount").is_some());
    }

    #[test]
    fn write_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpu-profile-1.cpuprofile");
        let profile = build(vec![stack("main", &["a"], 1)]);

        profile.write_to(&path).unwrap();
        let parsed: CpuProfile = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed, profile);

        let err = profile.write_to(&path).unwrap_err();
        assert!(matches!(err, ProfilerError::Io { .. }));
    }
}
