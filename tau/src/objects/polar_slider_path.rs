use std::cell::Cell;

use thiserror::Error;

use crate::file::beatmap::Timestamp;
use crate::utils::shortest_angle_delta;

/// A control point of a polar slider path.
///
/// Angles are in degrees and are not normalized, so a path can turn more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SliderNode {
	/// Offset from the start of the slider, in milliseconds.
	pub time: Timestamp,
	pub angle: f64,
}

impl SliderNode {
	#[must_use]
	pub const fn new(time: Timestamp, angle: f64) -> Self {
		Self { time, angle }
	}
}

#[derive(Clone, Copy, Debug, Error)]
#[error("A polar slider path needs at least one node")]
pub struct EmptyPathError;

/// Motion on the tau circle over time, as a list of nodes sorted by time.
#[derive(Clone, Debug)]
pub struct PolarSliderPath {
	nodes: Vec<SliderNode>,
	/// Distance imposed by distance snapping, if any.
	pub expected_distance: Option<f64>,
	length_valid: Cell<bool>,
	calculated_length: Cell<f64>,
}

impl PolarSliderPath {
	/// # Errors
	///
	/// This function will return an error if `nodes` is empty.
	pub fn new(nodes: Vec<SliderNode>, expected_distance: Option<f64>) -> Result<Self, EmptyPathError> {
		if nodes.is_empty() {
			return Err(EmptyPathError);
		}

		Ok(Self {
			nodes,
			expected_distance,
			length_valid: Cell::new(false),
			calculated_length: Cell::new(0.),
		})
	}

	#[must_use]
	pub fn nodes(&self) -> &[SliderNode] {
		&self.nodes
	}

	/// Appends a node at the end of the path.
	pub fn push_node(&mut self, node: SliderNode) {
		self.nodes.push(node);
		self.length_valid.set(false);
	}

	/// Replaces every node of the path.
	///
	/// # Errors
	///
	/// This function will return an error if `nodes` is empty, in which case the path is left untouched.
	pub fn set_nodes(&mut self, nodes: Vec<SliderNode>) -> Result<(), EmptyPathError> {
		if nodes.is_empty() {
			return Err(EmptyPathError);
		}

		self.nodes = nodes;
		self.length_valid.set(false);
		Ok(())
	}

	/// Time of the latest node.
	#[must_use]
	pub fn duration(&self) -> Timestamp {
		self.nodes.iter().map(|n| n.time).fold(0., f64::max)
	}

	/// Last node of the path, or a node at `(0, 0)` if there is none.
	#[must_use]
	pub fn end_node(&self) -> SliderNode {
		self.nodes.last().copied().unwrap_or_default()
	}

	/// Total rotation in degrees travelled along the path.
	#[must_use]
	pub fn calculated_distance(&self) -> f64 {
		if !self.length_valid.get() {
			self.calculated_length.set(self.calculate_length());
			self.length_valid.set(true);
		}

		self.calculated_length.get()
	}

	fn calculate_length(&self) -> f64 {
		let Some(first) = self.nodes.first() else {
			return 0.;
		};

		let mut angle = first.angle;
		let mut sum = 0.;
		for node in &self.nodes {
			sum += shortest_angle_delta(angle, node.angle).abs();
			angle = node.angle;
		}

		sum
	}

	/// Nodes from the first one at or after `start` up to the last one at or before `end`.
	///
	/// Nothing is returned when the first of those nodes is the very first node of the path.
	#[must_use]
	pub fn nodes_between(&self, start: Timestamp, end: Timestamp) -> &[SliderNode] {
		let mut index = None;
		let mut length = 0;

		for (i, node) in self.nodes.iter().enumerate() {
			if node.time < start {
				continue;
			}

			let first = *index.get_or_insert(i);

			if node.time > end {
				break;
			}

			length = i + 1 - first;
		}

		match index {
			None | Some(0) => &[],
			Some(index) => &self.nodes[index..index + length],
		}
	}

	/// Angle of the path at `time`, interpolated the short way between the surrounding nodes.
	#[must_use]
	pub fn angle_at(&self, time: Timestamp) -> f64 {
		let (Some(first), Some(last)) = (self.nodes.first(), self.nodes.last()) else {
			return 0.;
		};

		if time <= 0. {
			return first.angle;
		}

		if time >= last.time {
			return last.angle;
		}

		let end_index = self.nodes.partition_point(|n| n.time < time);
		if end_index == 0 {
			return first.angle;
		}

		let start = self.nodes[end_index - 1];
		let Some(end) = self.nodes.get(end_index) else {
			return start.angle;
		};

		let delta_angle = shortest_angle_delta(start.angle, end.angle);
		let duration = end.time - start.time;

		start.angle + delta_angle * (time - start.time) / duration
	}
}
