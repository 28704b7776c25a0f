pub mod boost;
pub mod filter;
pub mod similarity;
pub mod threshold;

/// A retrieval candidate carrying both its raw and boosted distance.
/// `boosted` starts equal to `distance` and only ever moves down.
#[derive(Clone, Debug)]
pub struct RankedDoc<T> {
	pub item: T,
	pub tag_ids: Vec<i32>,
	pub distance: f32,
	pub boosted: f32,
}
impl<T> RankedDoc<T> {
	pub fn new(item: T, tag_ids: Vec<i32>, distance: f32) -> Self {
		Self { item, tag_ids, distance, boosted: distance }
	}
}
