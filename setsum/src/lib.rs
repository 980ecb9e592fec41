#![doc = include_str!("../README.md")]

// Copyright (c) 2020 Dropbox, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::convert::TryInto;
use std::fmt::{Debug, Write};

use sha3::{Digest, Sha3_256};

/// The number of bytes in the digest of both the hash used by setsum and the output
/// of setsum.
pub const SETSUM_BYTES: usize = 32;
/// The number of bytes per column.  This should evenly divide the number of bytes.  This number is
/// implicitly wound through the code in its use of u32 to store columns as it's the number of bytes
/// used to store a u32.
const SETSUM_BYTES_PER_COLUMN: usize = 4;
/// The number of columns in the logical/internal representation of the setsum.
const SETSUM_COLUMNS: usize = SETSUM_BYTES / SETSUM_BYTES_PER_COLUMN;
/// Each column uses a different prime to construct a field of different size and transformations.
const SETSUM_PRIMES: [u32; SETSUM_COLUMNS] = [
    4294967291, 4294967279, 4294967231, 4294967197, 4294967189, 4294967161, 4294967143, 4294967111,
];

/// Adds together two internal representations and constructs their output.  The algorithm for
/// column i is `(A[i] + B[i]) % P[i]`, where `P` is the primes array.
#[inline(always)]
pub fn add_state(lhs: [u32; SETSUM_COLUMNS], rhs: [u32; SETSUM_COLUMNS]) -> [u32; SETSUM_COLUMNS] {
    let mut ret = <[u32; SETSUM_COLUMNS]>::default();
    for i in 0..SETSUM_COLUMNS {
        let lc = lhs[i] as u64;
        let rc = rhs[i] as u64;
        let mut sum = lc + rc;
        let p = SETSUM_PRIMES[i] as u64;
        if sum >= p {
            sum -= p;
        }
        ret[i] = sum as u32;
    }
    ret
}

/// Converts each column in the provided state to be the inverse of the input.  This means that the
/// two columns added together via add_state will come out zero.
#[inline(always)]
pub fn invert_state(state: [u32; SETSUM_COLUMNS]) -> [u32; SETSUM_COLUMNS] {
    let mut state = state;
    for i in 0..SETSUM_COLUMNS {
        state[i] = SETSUM_PRIMES[i] - state[i]
    }
    state
}

/// Translate a single hash into the internal representation of a setsum.
fn hash_to_state(hash: &[u8; SETSUM_BYTES]) -> [u32; SETSUM_COLUMNS] {
    let mut item_state = [0u32; SETSUM_COLUMNS];
    for i in 0..SETSUM_COLUMNS {
        let idx = i * SETSUM_BYTES_PER_COLUMN;
        let end = idx + SETSUM_BYTES_PER_COLUMN;
        let buf: [u8; 4] = hash[idx..end].try_into().unwrap();
        let num = u32::from_le_bytes(buf);
        item_state[i] = if num >= SETSUM_PRIMES[i] {
            num - SETSUM_PRIMES[i]
        } else {
            num
        };
    }
    item_state
}

/// Translate an item comprised of multiple vectors to a setsum.
fn item_vectored_to_state(item: &[&[u8]]) -> [u32; SETSUM_COLUMNS] {
    let mut hasher = Sha3_256::default();
    for piece in item {
        hasher.update(piece);
    }
    let mut hash_bytes = hasher.finalize();
    let hash_bytes: &mut [u8; SETSUM_BYTES] = hash_bytes.as_mut();
    hash_to_state(hash_bytes)
}

/// Setsum provides an interactive object for maintaining set checksums.  Technically, multi-set
/// checksums.  Two Setsum objects are equal with high probability if and only if they contain the
/// same items.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Setsum {
    state: [u32; SETSUM_COLUMNS],
}

impl Setsum {
    /// Inserts a new item into the multi-set.  If the item was already inserted, it will be
    /// inserted again.
    pub fn insert(&mut self, item: &[u8]) {
        let item: &[&[u8]] = &[item];
        self.insert_vectored(item);
    }

    /// Vectored version of insert.
    pub fn insert_vectored(&mut self, item: &[&[u8]]) {
        let item_state = item_vectored_to_state(item);
        self.state = add_state(self.state, item_state);
    }

    /// Removes an item from the multi-set.  It is up to the caller to make sure the item already
    /// existed in the multi-set; otherwise, a "placeholder" will be inserted that will consume
    /// one insert of the item.  Multiple placeholders can accrue and all will be removed before the
    /// set matches a set in which the item was inserted.
    pub fn remove(&mut self, item: &[u8]) {
        let item: &[&[u8]] = &[item];
        self.remove_vectored(item);
    }

    /// Vectored version of remove.
    pub fn remove_vectored(&mut self, item: &[&[u8]]) {
        let item_state = item_vectored_to_state(item);
        let item_state = invert_state(item_state);
        self.state = add_state(self.state, item_state);
    }

    /// Computes a byte representation of the setsum for comparison or use in other situations.
    pub fn digest(&self) -> [u8; SETSUM_BYTES] {
        let mut item_hash = [0u8; SETSUM_BYTES];
        for col in 0..SETSUM_COLUMNS {
            let idx = col * SETSUM_BYTES_PER_COLUMN;
            let buf = self.state[col].to_le_bytes();
            item_hash[idx..(4 + idx)].copy_from_slice(&buf[..4]);
        }
        item_hash
    }

    /// Creates a setsum from an array of SETSUM_BYTES.
    pub fn from_digest(digest: [u8; SETSUM_BYTES]) -> Setsum {
        let mut state: [u32; SETSUM_COLUMNS] = [0u32; SETSUM_COLUMNS];
        for (col, item) in state.iter_mut().enumerate().take(SETSUM_COLUMNS) {
            let idx = col * SETSUM_BYTES_PER_COLUMN;
            let mut buf = [0u8; 4];
            buf.clone_from_slice(&digest[idx..idx + 4]);
            *item = u32::from_le_bytes(buf);
        }
        Self { state }
    }

    /// Computes an ASCII/hex representation of setsum for comparison or use in other situations.
    pub fn hexdigest(&self) -> String {
        let mut setsum = String::with_capacity(68);
        let digest = self.digest();
        for item in &digest {
            write!(&mut setsum, "{:02x}", *item).expect("unable to write to string");
        }
        setsum
    }

    /// Creates a setsum from an ASCII/hex string.
    pub fn from_hexdigest(digest: &str) -> Option<Setsum> {
        if digest.len() != SETSUM_BYTES * 2 {
            return None;
        }
        let mut bytes: [u8; SETSUM_BYTES] = [0u8; SETSUM_BYTES];
        for idx in 0..SETSUM_BYTES {
            bytes[idx] = match u8::from_str_radix(&digest[idx * 2..idx * 2 + 2], 16) {
                Ok(b) => b,
                Err(_) => {
                    return None;
                }
            }
        }
        Some(Self::from_digest(bytes))
    }
}

impl Default for Setsum {
    fn default() -> Setsum {
        Setsum {
            state: [0u32; SETSUM_COLUMNS],
        }
    }
}

impl Debug for Setsum {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.hexdigest())
    }
}

impl std::ops::Add<Setsum> for Setsum {
    type Output = Setsum;

    fn add(self, rhs: Setsum) -> Setsum {
        let state = add_state(self.state, rhs.state);
        Setsum { state }
    }
}

impl std::ops::AddAssign<Setsum> for Setsum {
    fn add_assign(&mut self, rhs: Setsum) {
        self.state = add_state(self.state, rhs.state);
    }
}

impl std::ops::Sub<Setsum> for Setsum {
    type Output = Setsum;

    fn sub(self, rhs: Setsum) -> Setsum {
        let rhs_state = invert_state(rhs.state);
        let state = add_state(self.state, rhs_state);
        Setsum { state }
    }
}

impl std::ops::SubAssign<Setsum> for Setsum {
    fn sub_assign(&mut self, rhs: Setsum) {
        let rhs_state = invert_state(rhs.state);
        self.state = add_state(self.state, rhs_state);
    }
}
