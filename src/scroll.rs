use std::cell::Cell;
use std::rc::Rc;

/// Horizontal scroll offset of the chart body, pushed one way to followers.
///
/// The body is the only writer. Followers (the axis header) get each new
/// value through a callback and have no handle to write it back.
#[derive(Default)]
pub struct ScrollSync {
	offset: f64,
	followers: Vec<Box<dyn FnMut(f64)>>,
}

impl ScrollSync {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn offset(&self) -> f64 {
		self.offset
	}

	/// Registers a follower and brings it up to date with the current offset.
	pub fn follow(&mut self, mut follower: impl FnMut(f64) + 'static) {
		follower(self.offset);
		self.followers.push(Box::new(follower));
	}

	/// Creates a header follower tracking this body.
	pub fn header(&mut self) -> HeaderFollower {
		let position = Rc::new(Cell::new(self.offset));
		let sink = Rc::clone(&position);
		self.follow(move |offset| sink.set(offset));
		HeaderFollower { position }
	}

	/// Body scroll event. Negative or non-finite offsets are treated as 0.
	pub fn on_body_scroll(&mut self, offset: f64) {
		let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
		if offset == self.offset {
			return;
		}
		self.offset = offset;
		for follower in &mut self.followers {
			follower(offset);
		}
	}

	pub fn follower_count(&self) -> usize {
		self.followers.len()
	}
}

/// Read-only view of the body's scroll offset for the axis header.
#[derive(Debug, Clone)]
pub struct HeaderFollower {
	position: Rc<Cell<f64>>,
}

impl HeaderFollower {
	pub fn offset(&self) -> f64 {
		self.position.get()
	}
}
