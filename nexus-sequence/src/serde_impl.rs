//! Sequence-shaped serde support for both list kinds.
//!
//! Lists serialize as a length-prefixed sequence in iteration order. On the
//! way back in, a stated length above [`GrowthPolicy::DEFAULT_MAX_LEN`] is
//! rejected before anything is allocated, and pre-sizing from the hint is
//! capped.

use core::fmt;
use core::marker::PhantomData;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::array::ArrayList;
use crate::config::GrowthPolicy;
use crate::key::Key;
use crate::linked::{LinkedList, Node};
use crate::storage::Storage;

const MAX_PREALLOCATE: usize = 4096;

fn serialize_iter<'a, T, I, Ser>(len: usize, items: I, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
where
    T: Serialize + 'a,
    I: Iterator<Item = &'a T>,
    Ser: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(len))?;
    for e in items {
        seq.serialize_element(e)?;
    }
    seq.end()
}

/// Rejects a stated length the lists could never hold.
fn checked_hint<E: de::Error>(hint: Option<usize>, exp: &dyn de::Expected) -> Result<usize, E> {
    match hint {
        Some(n) if n > GrowthPolicy::DEFAULT_MAX_LEN => Err(E::invalid_length(n, exp)),
        Some(n) => Ok(n.min(MAX_PREALLOCATE)),
        None => Ok(0),
    }
}

// =============================================================================
// ArrayList
// =============================================================================

impl<T: Serialize> Serialize for ArrayList<T> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serialize_iter(self.len(), self.iter(), serializer)
    }
}

struct ArrayListVisitor<T> {
    marker: PhantomData<fn() -> T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for ArrayListVisitor<T> {
    type Value = ArrayList<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let capacity = checked_hint(seq.size_hint(), &self)?;
        let mut list = if capacity == 0 {
            ArrayList::new()
        } else {
            ArrayList::try_with_capacity(capacity).map_err(de::Error::custom)?
        };
        while let Some(e) = seq.next_element()? {
            list.push(e).map_err(de::Error::custom)?;
        }
        Ok(list)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ArrayList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ArrayListVisitor { marker: PhantomData })
    }
}

// =============================================================================
// LinkedList
// =============================================================================

impl<T: Serialize, S, K: Key> Serialize for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serialize_iter(self.len(), self.iter(), serializer)
    }
}

struct LinkedListVisitor<T, S, K> {
    marker: PhantomData<fn() -> (T, S, K)>,
}

impl<'de, T: Deserialize<'de>, S, K: Key> Visitor<'de> for LinkedListVisitor<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Value = LinkedList<T, S, K>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        checked_hint(seq.size_hint(), &self)?;
        let mut list = LinkedList::default();
        while let Some(e) = seq.next_element()? {
            if list.len() == GrowthPolicy::DEFAULT_MAX_LEN {
                return Err(de::Error::invalid_length(list.len() + 1, &self));
            }
            list.push_back(e);
        }
        Ok(list)
    }
}

impl<'de, T: Deserialize<'de>, S, K: Key> Deserialize<'de> for LinkedList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(LinkedListVisitor { marker: PhantomData })
    }
}
