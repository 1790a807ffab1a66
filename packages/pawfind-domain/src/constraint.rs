use serde::{Deserialize, Serialize};

/// A single-field filter.
///
/// `Unspecified` is not a wildcard: it selects records whose field is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Constraint<T> {
	#[default]
	Any,
	Unspecified,
	Value(T),
}
impl<T> Constraint<T>
where
	T: PartialEq,
{
	pub fn is_any(&self) -> bool {
		matches!(self, Self::Any)
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Self::Value(value) => Some(value),
			Self::Any | Self::Unspecified => None,
		}
	}

	/// Tests a nullable field.
	pub fn matches(&self, field: Option<&T>) -> bool {
		match self {
			Self::Any => true,
			Self::Unspecified => field.is_none(),
			Self::Value(expected) => field == Some(expected),
		}
	}

	/// Tests a field that is always present on a record.
	pub fn matches_present(&self, field: &T) -> bool {
		self.matches(Some(field))
	}
}
