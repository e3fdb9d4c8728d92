use itertools::{EitherOrBoth::*, Itertools};
use num_traits::*;
use smallvec::SmallVec;
use std::fmt::{self, Binary, Debug, Formatter};
use std::ops::*;

/// Growable bit set stored in words of `T`, inline up to `N` words.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct BitSet<T, const N: usize>(SmallVec<T, N>);
impl<T: PrimInt + Zero, const N: usize> BitSet<T, N> {
    pub const fn new() -> Self {
        Self(SmallVec::new())
    }
    pub fn with_capacity(cap: usize) -> Self {
        let bits = Self::word_bits();
        Self(SmallVec::from_elem(T::zero(), cap.div_ceil(bits)))
    }
    pub fn from_ones(bits: impl IntoIterator<Item = usize>) -> Self {
        let mut out = Self::new();
        for bit in bits {
            out.set(bit, true);
        }
        out
    }

    #[inline(always)]
    fn word_bits() -> usize {
        T::zero().count_zeros() as usize
    }

    pub fn as_slice(&self) -> &[T] {
        self.0.as_slice()
    }

    pub fn get(&self, idx: usize) -> bool {
        let bits = Self::word_bits();
        self.0
            .get(idx / bits)
            .map_or(false, |&i| i & (T::one() << (idx % bits)) != T::zero())
    }
    pub fn set(&mut self, idx: usize, bit: bool) {
        let bits = Self::word_bits();
        let si = idx / bits;
        let sb = idx % bits;
        if si >= self.0.len() {
            if !bit {
                return;
            }
            self.0.resize(si + 1, T::zero());
        }
        let word = self.0[si];
        self.0[si] = if bit {
            word | (T::one() << sb)
        } else {
            word & !(T::one() << sb)
        };
    }
    pub fn clear(&mut self) {
        for i in &mut self.0 {
            *i = T::zero();
        }
    }

    pub fn all_zero(&self) -> bool {
        let zero = T::zero();
        self.0.iter().all(|&i| i == zero)
    }
    pub fn count_ones(&self) -> usize {
        self.0.iter().map(|i| i.count_ones() as usize).sum()
    }

    /// Index of the highest set bit.
    pub fn last_one(&self) -> Option<usize> {
        let bits = Self::word_bits();
        self.0
            .iter()
            .rposition(|&w| w != T::zero())
            .map(|n| n * bits + bits - 1 - self.0[n].leading_zeros() as usize)
    }
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        let bits = Self::word_bits();
        self.0.iter().enumerate().flat_map(move |(n, &w)| {
            (0..bits).filter(move |&b| w & (T::one() << b) != T::zero()).map(move |b| n * bits + b)
        })
    }
}

impl<T: Binary, const N: usize> Debug for BitSet<T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut l = f.debug_list();
        for i in &self.0 {
            l.entry(&format_args!("{i:0>0$b}", std::mem::size_of::<T>() * 8));
        }
        l.finish()
    }
}

impl<T: PrimInt, const N: usize> BitAnd for &BitSet<T, N> {
    type Output = BitSet<T, N>;

    fn bitand(self, rhs: Self) -> BitSet<T, N> {
        BitSet(self.0.iter().zip(&rhs.0).map(|(l, r)| *l & *r).collect())
    }
}

impl<T: PrimInt, const N: usize> BitOr for &BitSet<T, N> {
    type Output = BitSet<T, N>;

    fn bitor(self, rhs: Self) -> BitSet<T, N> {
        BitSet(
            self.0
                .iter()
                .zip_longest(&rhs.0)
                .map(|e| match e {
                    Left(i) | Right(i) => *i,
                    Both(l, r) => *l | *r,
                })
                .collect(),
        )
    }
}

impl<T: PrimInt, const N: usize> BitOrAssign<&Self> for BitSet<T, N> {
    fn bitor_assign(&mut self, rhs: &Self) {
        let mut iter = rhs.0.iter();
        self.0
            .iter_mut()
            .zip(iter.by_ref())
            .for_each(|(l, r)| *l = *l | *r);
        self.0.extend(iter.copied());
    }
}

impl<T: PrimInt, const N: usize> BitXor for &BitSet<T, N> {
    type Output = BitSet<T, N>;

    fn bitxor(self, rhs: Self) -> BitSet<T, N> {
        BitSet(
            self.0
                .iter()
                .zip_longest(&rhs.0)
                .map(|e| match e {
                    Left(i) | Right(i) => *i,
                    Both(l, r) => *l ^ *r,
                })
                .collect(),
        )
    }
}

impl<T: PrimInt, const N: usize> BitXorAssign<&Self> for BitSet<T, N> {
    fn bitxor_assign(&mut self, rhs: &Self) {
        let mut iter = rhs.0.iter();
        self.0
            .iter_mut()
            .zip(iter.by_ref())
            .for_each(|(l, r)| *l = *l ^ *r);
        self.0.extend(iter.copied());
    }
}
