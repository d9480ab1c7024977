//! Embedded paths: named sequences of oriented node references.
//!
//! A path step packs a node id together with its traversal orientation into
//! one unsigned word: the topmost bit of the id width is the reverse flag,
//! the remaining bits are the id. The dynamic [`PathSet`] keeps paths in
//! growable records; [`PackedPathSet`] mirrors the packed node store with
//! one record per path in a single vector plus a rank/select bit vector and
//! all names concatenated in one string.

use hashbrown::HashSet;
use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitvector::{BitVector, IndexedBits};
use crate::error::GraphError;
use crate::index::{is_sentinel, zero, DefaultIx, IdType};

/// One oriented node reference on a path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step<Ix>(Ix);

impl<Ix: IdType> Step<Ix> {
    #[inline]
    fn orientation_bit() -> usize {
        1 << (Ix::BITS - 1)
    }

    #[inline]
    pub fn new(id: Ix, reversed: bool) -> Self {
        debug_assert_eq!(id.index() & Self::orientation_bit(), 0);
        let mut value = id.index();
        if reversed {
            value |= Self::orientation_bit();
        }
        Step(Ix::new(value))
    }

    /// The referenced node id, with the orientation bit masked off.
    #[inline]
    pub fn id(self) -> Ix {
        Ix::new(self.0.index() & !Self::orientation_bit())
    }

    /// `true` if the node is traversed in reverse.
    #[inline]
    pub fn is_reversed(self) -> bool {
        self.0.index() >> (Ix::BITS - 1) == 1
    }

    /// The raw packed word.
    #[inline]
    pub fn value(self) -> Ix {
        self.0
    }

    #[inline]
    pub(crate) fn from_value(value: Ix) -> Self {
        Step(value)
    }

    #[inline]
    pub(crate) fn toggle(&mut self) {
        self.0 = Ix::new(self.0.index() ^ Self::orientation_bit());
    }
}

/// A named walk through the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path<Ix> {
    id: Ix,
    name: String,
    steps: Vec<Step<Ix>>,
}

impl<Ix: IdType> Path<Ix> {
    fn new(id: Ix, name: String) -> Self {
        Path {
            id,
            name,
            steps: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> Ix {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn steps(&self) -> &[Step<Ix>] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn front(&self) -> Option<Step<Ix>> {
        self.steps.first().copied()
    }

    #[inline]
    pub fn back(&self) -> Option<Step<Ix>> {
        self.steps.last().copied()
    }

    #[inline]
    pub fn add_step(&mut self, id: Ix, reversed: bool) {
        self.steps.push(Step::new(id, reversed));
    }

    /// Toggle the reverse flag of every step visiting `node_id`.
    pub fn flip_orientation(&mut self, node_id: Ix) {
        for step in &mut self.steps {
            if step.id() == node_id {
                step.toggle();
            }
        }
    }

    /// Toggle the reverse flag of every step visiting a node in `node_set`.
    pub fn flip_orientation_set(&mut self, node_set: &HashSet<Ix>) {
        for step in &mut self.steps {
            if node_set.contains(&step.id()) {
                step.toggle();
            }
        }
    }

    /// Call `f` with `(node id, reversed)` per step in path order; `f`
    /// returns `false` to halt.
    pub fn for_each_step<F>(&self, mut f: F) -> bool
    where
        F: FnMut(Ix, bool) -> bool,
    {
        for step in &self.steps {
            if !f(step.id(), step.is_reversed()) {
                return false;
            }
        }
        true
    }

    pub fn shrink_to_fit(&mut self) {
        self.name.shrink_to_fit();
        self.steps.shrink_to_fit();
    }
}

/// The mutable collection of a graph's paths, in insertion (rank) order.
#[derive(Clone, Debug, Default)]
pub struct PathSet<Ix>
where
    Ix: IdType,
{
    paths: IndexMap<Ix, Path<Ix>>,
    max_id: usize,
}

impl<Ix: IdType> PathSet<Ix> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Create an empty path; ids are assigned sequentially from 1.
    pub fn add_path(&mut self, name: impl Into<String>) -> Ix {
        self.max_id += 1;
        let id = Ix::new(self.max_id);
        self.paths.insert(id, Path::new(id, name.into()));
        id
    }

    /// Create a path and fill it from an iterator of `(node id, reversed)`
    /// steps.
    pub fn add_path_with_steps<I>(&mut self, name: impl Into<String>, steps: I) -> Ix
    where
        I: IntoIterator<Item = (Ix, bool)>,
    {
        let id = self.add_path(name);
        self.extend_path_with(id, steps)
            .expect("freshly added path exists");
        id
    }

    /// Append one step to a path.
    pub fn extend_path(&mut self, pid: Ix, node_id: Ix, reversed: bool) -> Result<(), GraphError> {
        let path = self
            .paths
            .get_mut(&pid)
            .ok_or(GraphError::MissingPath(pid.index()))?;
        path.add_step(node_id, reversed);
        Ok(())
    }

    /// Append a batch of `(node id, reversed)` steps to a path.
    pub fn extend_path_with<I>(&mut self, pid: Ix, steps: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (Ix, bool)>,
    {
        let path = self
            .paths
            .get_mut(&pid)
            .ok_or(GraphError::MissingPath(pid.index()))?;
        for (node_id, reversed) in steps {
            path.add_step(node_id, reversed);
        }
        Ok(())
    }

    #[inline]
    pub fn has_path(&self, id: Ix) -> bool {
        self.paths.contains_key(&id)
    }

    /// Rank of a path, or 0 when the id is not present.
    #[inline]
    pub fn id_to_rank(&self, id: Ix) -> usize {
        match self.paths.get_index_of(&id) {
            Some(i) => i + 1,
            None => 0,
        }
    }

    /// Path id at `rank`, which must lie in `[1, path_count]`.
    #[inline]
    pub fn rank_to_id(&self, rank: usize) -> Ix {
        debug_assert!(rank >= 1 && rank <= self.path_count());
        *self
            .paths
            .get_index(rank - 1)
            .map(|(id, _)| id)
            .expect("path rank out of range")
    }

    /// Id of the path at the next rank, or 0 at the end.
    pub fn successor_id(&self, id: Ix) -> Ix {
        let rank = self.id_to_rank(id);
        if rank == 0 || rank == self.path_count() {
            return zero();
        }
        self.rank_to_id(rank + 1)
    }

    pub fn path(&self, id: Ix) -> Option<&Path<Ix>> {
        self.paths.get(&id)
    }

    pub fn path_length(&self, id: Ix) -> usize {
        self.paths.get(&id).map_or(0, Path::len)
    }

    pub fn path_name(&self, id: Ix) -> Option<&str> {
        self.paths.get(&id).map(Path::name)
    }

    /// Call `f` with `(rank, id)` per path in rank order starting at
    /// `rank`; `f` returns `false` to halt.
    pub fn for_each_path_from<F>(&self, mut rank: usize, mut f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        debug_assert!(rank >= 1);
        if rank > self.path_count() {
            return true;
        }
        for (&id, _) in self.paths.iter().skip(rank - 1) {
            if !f(rank, id) {
                return false;
            }
            rank += 1;
        }
        true
    }

    #[inline]
    pub fn for_each_path<F>(&self, f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        self.for_each_path_from(1, f)
    }

    /// Toggle the reverse flag of every step visiting `node_id`, across all
    /// paths.
    pub fn flip_orientation(&mut self, node_id: Ix) {
        for path in self.paths.values_mut() {
            path.flip_orientation(node_id);
        }
    }

    /// Toggle the reverse flag of every step visiting a node in `node_set`,
    /// across all paths.
    pub fn flip_orientation_set(&mut self, node_set: &HashSet<Ix>) {
        if node_set.is_empty() {
            return;
        }
        for path in self.paths.values_mut() {
            path.flip_orientation_set(node_set);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Path<Ix>> {
        self.paths.values()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.max_id = 0;
    }

    pub fn shrink_to_fit(&mut self) {
        for path in self.paths.values_mut() {
            path.shrink_to_fit();
        }
        self.paths.shrink_to_fit();
    }
}

// Rank order is part of the value, so equality walks the records in order.
impl<Ix: IdType> PartialEq for PathSet<Ix> {
    fn eq(&self, other: &Self) -> bool {
        self.max_id == other.max_id && self.paths.iter().eq(other.paths.iter())
    }
}

/// The read-only packed collection of a graph's paths.
///
/// One record per path, in rank order:
///
/// ```text
/// [ id : length : name_pos : name_len : step ... ]
/// ```
///
/// As in the packed node store, a path's id is the offset of its record and
/// a companion bit vector marks record starts. Names live concatenated in a
/// separate byte container.
#[derive(Clone, Debug)]
pub struct PackedPathSet<Ix = DefaultIx>
where
    Ix: IdType,
{
    path_count: usize,
    data: Vec<Ix>,
    ids: IndexedBits,
    names: String,
}

impl<Ix: IdType> Default for PackedPathSet<Ix> {
    fn default() -> Self {
        PackedPathSet {
            path_count: 0,
            data: vec![zero(); 1],
            ids: IndexedBits::build(BitVector::with_len(1)),
            names: String::new(),
        }
    }
}

const PATH_HEADER_LEN: usize = 4;
const PATH_LEN_OFFSET: usize = 1;
const NAME_POS_OFFSET: usize = 2;
const NAME_LEN_OFFSET: usize = 3;

impl<Ix: IdType> PackedPathSet<Ix> {
    /// Pack a dynamic path set, translating every step id through `map`.
    pub fn from_paths<F>(source: &PathSet<Ix>, mut map: F) -> Self
    where
        F: FnMut(Ix) -> Ix,
    {
        let step_total: usize = source.iter().map(Path::len).sum();
        let total = source.path_count() * PATH_HEADER_LEN + step_total + 1;
        let mut data: Vec<Ix> = vec![zero(); total];
        let mut bits = BitVector::with_len(total);
        let mut names = String::new();

        let mut pos = 1;
        for path in source.iter() {
            bits.set(pos - 1, true);
            data[pos] = Ix::new(pos);
            data[pos + PATH_LEN_OFFSET] = Ix::new(path.len());
            data[pos + NAME_POS_OFFSET] = Ix::new(names.len());
            data[pos + NAME_LEN_OFFSET] = Ix::new(path.name().len());
            names.push_str(path.name());
            pos += PATH_HEADER_LEN;
            for step in path.steps() {
                data[pos] = Step::new(map(step.id()), step.is_reversed()).value();
                pos += 1;
            }
        }
        debug_assert_eq!(pos, total);

        PackedPathSet {
            path_count: source.path_count(),
            data,
            ids: IndexedBits::build(bits),
            names,
        }
    }

    #[inline]
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    #[inline]
    pub fn has_path(&self, id: Ix) -> bool {
        let idx = id.index();
        idx > 0 && idx < self.data.len() && self.ids.get(idx - 1)
    }

    /// Rank of a path; the id must be present.
    #[inline]
    pub fn id_to_rank(&self, id: Ix) -> usize {
        debug_assert!(self.has_path(id));
        self.ids.rank1(id.index())
    }

    /// Path id at `rank`, which must lie in `[1, path_count]`.
    #[inline]
    pub fn rank_to_id(&self, rank: usize) -> Ix {
        debug_assert!(rank >= 1 && rank <= self.path_count);
        Ix::new(self.ids.select1(rank) + 1)
    }

    /// Id of the path at the next rank, or 0 at the end.
    pub fn successor_id(&self, id: Ix) -> Ix {
        debug_assert!(self.has_path(id));
        let next = id.index() + PATH_HEADER_LEN + self.path_length(id);
        if next < self.data.len() {
            Ix::new(next)
        } else {
            zero()
        }
    }

    #[inline]
    pub fn path_length(&self, id: Ix) -> usize {
        debug_assert!(self.has_path(id));
        self.data[id.index() + PATH_LEN_OFFSET].index()
    }

    pub fn path_name(&self, id: Ix) -> &str {
        debug_assert!(self.has_path(id));
        let start = self.data[id.index() + NAME_POS_OFFSET].index();
        let len = self.data[id.index() + NAME_LEN_OFFSET].index();
        &self.names[start..start + len]
    }

    /// The steps of a path, decoded into an owned vector.
    pub fn steps(&self, id: Ix) -> Vec<Step<Ix>> {
        let start = id.index() + PATH_HEADER_LEN;
        self.data[start..start + self.path_length(id)]
            .iter()
            .map(|&v| Step::from_value(v))
            .collect()
    }

    /// Call `f` with `(node id, reversed)` per step in path order; `f`
    /// returns `false` to halt.
    pub fn for_each_step<F>(&self, id: Ix, mut f: F) -> bool
    where
        F: FnMut(Ix, bool) -> bool,
    {
        let start = id.index() + PATH_HEADER_LEN;
        for &value in &self.data[start..start + self.path_length(id)] {
            let step = Step::from_value(value);
            if !f(step.id(), step.is_reversed()) {
                return false;
            }
        }
        true
    }

    /// Call `f` with `(rank, id)` per path in rank order starting at
    /// `rank`; `f` returns `false` to halt.
    pub fn for_each_path_from<F>(&self, mut rank: usize, mut f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        debug_assert!(rank >= 1);
        if rank > self.path_count {
            return true;
        }
        let mut id = self.rank_to_id(rank);
        while !is_sentinel(id) {
            if !f(rank, id) {
                return false;
            }
            id = self.successor_id(id);
            rank += 1;
        }
        true
    }

    #[inline]
    pub fn for_each_path<F>(&self, f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        self.for_each_path_from(1, f)
    }

    /// Rewrite every step id through `map`, preserving the reverse flags.
    pub fn apply_coordinate<F>(&mut self, mut map: F)
    where
        F: FnMut(Ix) -> Ix,
    {
        let mut rank = 1;
        while rank <= self.path_count {
            let id = self.rank_to_id(rank);
            let start = id.index() + PATH_HEADER_LEN;
            for pos in start..start + self.path_length(id) {
                let step = Step::from_value(self.data[pos]);
                self.data[pos] = Step::new(map(step.id()), step.is_reversed()).value();
            }
            rank += 1;
        }
    }

    pub fn clear(&mut self) {
        self.path_count = 0;
        self.data = vec![zero(); 1];
        self.ids = IndexedBits::build(BitVector::with_len(1));
        self.names.clear();
    }
}

impl<Ix: IdType> PartialEq for PackedPathSet<Ix> {
    fn eq(&self, other: &Self) -> bool {
        self.path_count == other.path_count
            && self.data == other.data
            && self.names == other.names
    }
}
