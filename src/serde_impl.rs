//! Serde support: a set serializes as a sequence in ascending order.
//!
//! Deserializing inserts every element, so out-of-order input is sorted and
//! duplicates collapse, the same as collecting into a set.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Set;

impl<T: Serialize> Serialize for Set<T> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let grove = self.holder().grove();
		let nodes = grove.nodes.borrow();
		let mut seq = serializer.serialize_seq(Some(nodes.len))?;
		let mut cur = nodes.root.map(|root| nodes.first(root));
		while let Some(id) = cur {
			seq.serialize_element(nodes.value(id))?;
			cur = nodes.next(id);
		}
		seq.end()
	}
}

struct SetVisitor<T> {
	marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for SetVisitor<T>
where
	T: Deserialize<'de> + Ord,
{
	type Value = Set<T>;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a sequence of set elements")
	}

	fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
	where
		A: SeqAccess<'de>,
	{
		let mut set = Set::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
		while let Some(value) = seq.next_element()? {
			set.insert(value);
		}
		Ok(set)
	}
}

impl<'de, T> Deserialize<'de> for Set<T>
where
	T: Deserialize<'de> + Ord,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_seq(SetVisitor {
			marker: PhantomData,
		})
	}
}
