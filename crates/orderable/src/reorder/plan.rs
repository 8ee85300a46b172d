use crate::orderable::Position;

/// How a single save affects the rest of its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
	/// No position requested: take the end of the group. `from` is the current position when the
	/// record is already a member.
	Append { from: Option<Position> },
	/// New member at an explicit position; everything at or after it moves up by one.
	Insert { at: Position },
	/// Members in `to..from` move up by one.
	MoveEarlier { from: Position, to: Position },
	/// Members in `from+1..=to` move down by one.
	MoveLater { from: Position, to: Position },
	Unchanged { at: Position },
}

impl Transition {
	#[must_use]
	pub fn plan(old: Option<Position>, new: Option<Position>) -> Self {
		match (old, new) {
			(from, None) => Self::Append { from },
			(None, Some(at)) => Self::Insert { at },
			(Some(from), Some(to)) if to < from => Self::MoveEarlier { from, to },
			(Some(from), Some(to)) if to > from => Self::MoveLater { from, to },
			(Some(_), Some(at)) => Self::Unchanged { at },
		}
	}

	/// Whether the record has to be parked on a scratch position before its siblings shift.
	#[must_use]
	pub const fn relocates(&self) -> bool {
		matches!(self, Self::MoveEarlier { .. } | Self::MoveLater { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unset_position_appends() {
		assert_eq!(Transition::plan(None, None), Transition::Append { from: None });
		assert_eq!(
			Transition::plan(Some(3), None),
			Transition::Append { from: Some(3) }
		);
	}

	#[test]
	fn new_record_with_position_inserts() {
		assert_eq!(Transition::plan(None, Some(0)), Transition::Insert { at: 0 });
	}

	#[test]
	fn moves_pick_a_direction() {
		let earlier = Transition::plan(Some(4), Some(2));
		assert_eq!(earlier, Transition::MoveEarlier { from: 4, to: 2 });
		assert!(earlier.relocates());

		let later = Transition::plan(Some(2), Some(4));
		assert_eq!(later, Transition::MoveLater { from: 2, to: 4 });
		assert!(later.relocates());
	}

	#[test]
	fn same_position_is_left_alone() {
		let unchanged = Transition::plan(Some(5), Some(5));
		assert_eq!(unchanged, Transition::Unchanged { at: 5 });
		assert!(!unchanged.relocates());
	}
}
