//! Main memory table of the search: the color slab, the six prefix/suffix
//! list kinds, the class lists, the poison region, and the journaled
//! writes that make backtracking cost only the changes made per level.
//!
//! The layout follows Knuth's presentation, in units of M4 = m^4 cells:
//! colors at offset 0; each list kind as three consecutive slabs
//! (inverted index, bucket cells, tail pointers) with the bucket cells of
//! P1, P2, P3, S1, S2, S3 at 2, 5, 8, 11, 14, 17 and the class lists at
//! 20; the poison region at 22 with its tail pointer in the cell just
//! below it. A bucket is open when tail > head, empty when tail = head,
//! and closed when tail = head - 1; every head sits above 2 * M4, so the
//! closed encoding never wraps a u32.

pub(crate) const RED: u32 = 0;
pub(crate) const BLUE: u32 = 1;
pub(crate) const GREEN: u32 = 2;

// Ample for every alphabet size; the journal is a Vec, so the pathological
// case reallocates instead of truncating.
const UNDO_RESERVE: usize = 1 << 16;

#[derive(Debug)]
pub(crate) struct Table {
    pub(crate) m: usize,
    pub(crate) m4: usize,
    /// Bucket cell offset of the class lists.
    pub(crate) cloff: usize,
    /// Head of the poison region.
    pub(crate) poison: usize,
    /// Address of the poison tail pointer.
    pub(crate) pp: usize,
    pub(crate) mem: Vec<u32>,
    stamp: Vec<u64>,
    undo: Vec<(u32, u32)>,
    sigma: u64,
}

impl Table {
    pub(crate) fn new(m: usize) -> Table {
        let m2 = m * m;
        let m3 = m2 * m;
        let m4 = m3 * m;
        let len = 47 * m4 / 2;

        let mut mem = vec![0u32; len];

        // colors start RED (zero); every reachable prefix/suffix bucket
        // starts empty, tail at head
        let (p1, p2, p3) = (2 * m4, 5 * m4, 8 * m4);
        let (s1, s2, s3) = (11 * m4, 14 * m4, 17 * m4);
        for a in 0..m {
            let v1 = a * m3;
            mem[p1 + m4 + v1] = (p1 + v1) as u32;
            mem[s1 + m4 + v1] = (s1 + v1) as u32;
            for b in 0..m {
                let v2 = v1 + b * m2;
                mem[p2 + m4 + v2] = (p2 + v2) as u32;
                mem[s2 + m4 + v2] = (s2 + v2) as u32;
                for c in 0..m {
                    let v3 = v2 + c * m;
                    mem[p3 + m4 + v3] = (p3 + v3) as u32;
                    mem[s3 + m4 + v3] = (s3 + v3) as u32;
                }
            }
        }

        let poison = 22 * m4;
        let pp = poison - 1;
        mem[pp] = poison as u32;

        Table {
            m,
            m4,
            cloff: 20 * m4,
            poison,
            pp,
            mem,
            stamp: vec![u64::max_value(); len],
            undo: Vec::with_capacity(UNDO_RESERVE),
            sigma: 0,
        }
    }

    /// Bucket cell offset of prefix/suffix list kind `i` (P1, P2, P3,
    /// S1, S2, S3 in that order).
    #[inline]
    pub(crate) fn affix_off(&self, i: usize) -> usize {
        (2 + 3 * i) * self.m4
    }

    /// Bucket coordinates of the six affixes of word `alf`: its 1-, 2-
    /// and 3-letter prefixes and suffixes, each zero-extended to four
    /// letters, in list-kind order.
    #[inline]
    pub(crate) fn affixes(&self, alf: u32) -> [usize; 6] {
        let a = alf as usize;
        let m = self.m;
        let m2 = m * m;
        let m3 = m2 * m;
        [
            a / m3 * m3,
            a / m2 * m2,
            a / m * m,
            a % m * m3,
            a % m2 * m2,
            a % m3 * m,
        ]
    }

    /// Initialize the (empty) bucket of class `c`.
    pub(crate) fn init_class(&mut self, c: usize) {
        let head = self.cloff + 4 * c;
        self.mem[head + self.m4] = head as u32;
    }

    /// Color `alf` BLUE and enter it into its six affix buckets and the
    /// bucket of class `c`. Initialization only; writes are not
    /// journaled.
    pub(crate) fn enroll(&mut self, alf: u32, c: u32) {
        self.mem[alf as usize] = BLUE;
        let affixes = self.affixes(alf);
        for (i, &v) in affixes.iter().enumerate() {
            let base = self.affix_off(i);
            self.insert(alf, base + self.m4 + v, base - self.m4);
        }
        let tail = self.cloff + self.m4 + 4 * c as usize;
        let ihead = self.cloff - self.m4;
        self.insert(alf, tail, ihead);
    }

    fn insert(&mut self, alf: u32, tail: usize, ihead: usize) {
        let t = self.mem[tail] as usize;
        self.mem[t] = alf;
        self.mem[ihead + alf as usize] = t as u32;
        self.mem[tail] = (t + 1) as u32;
    }

    /// Journaled write: the original value of a cell is pushed at most
    /// once per round, keyed by the round stamp.
    #[inline]
    pub(crate) fn store(&mut self, a: usize, v: u32) {
        if self.stamp[a] != self.sigma {
            self.stamp[a] = self.sigma;
            self.undo.push((a as u32, self.mem[a]));
        }
        self.mem[a] = v;
    }

    /// Start a new round: writes from now on journal their own originals.
    #[inline]
    pub(crate) fn bump(&mut self) {
        self.sigma += 1;
    }

    /// Current journal watermark.
    #[inline]
    pub(crate) fn mark(&self) -> usize {
        self.undo.len()
    }

    /// Rewind the journal to `mark`, restoring every cell written since.
    pub(crate) fn rewind(&mut self, mark: usize) {
        for &(a, v) in self.undo[mark..].iter().rev() {
            self.mem[a as usize] = v;
        }
        self.undo.truncate(mark);
    }

    /// Remove `alf` from the bucket at coordinate `v` of the list kind
    /// based at `base`, swapping with the last entry. A closed or killed
    /// bucket is left alone.
    pub(crate) fn rem(&mut self, alf: u32, v: usize, base: usize) {
        let p = base + v;
        let q = (self.mem[p + self.m4] - 1) as usize;
        if q >= p {
            self.store(p + self.m4, q as u32);
            let t = self.mem[base - self.m4 + alf as usize] as usize;
            if t != q {
                let y = self.mem[q];
                self.store(t, y);
                self.store(base - self.m4 + y as usize, t as u32);
            }
        }
    }

    /// Close the bucket at coordinate `v` of the list kind based at
    /// `base`. Returns the head and the pre-close tail so the caller can
    /// walk the frozen contents.
    pub(crate) fn close(&mut self, v: usize, base: usize) -> (usize, usize) {
        let p = base + v;
        let q = self.mem[p + self.m4] as usize;
        if q != p - 1 {
            self.store(p + self.m4, (p - 1) as u32);
        }
        (p, q)
    }

    /// Exclude `alf` from the code being built: recolor it RED and remove
    /// it from its six affix buckets and from class `c`.
    pub(crate) fn red(&mut self, alf: u32, c: u32) {
        self.store(alf as usize, RED);
        let affixes = self.affixes(alf);
        for (i, &v) in affixes.iter().enumerate() {
            self.rem(alf, v, self.affix_off(i));
        }
        self.rem(alf, 4 * c as usize, self.cloff);
    }

    /// Select `alf` into the code: recolor it GREEN, close all seven of
    /// its buckets, and redden the rest of class `c`.
    ///
    /// Closing the class list first freezes its cells, so walking the
    /// pre-close contents while reddening is sound.
    pub(crate) fn green(&mut self, alf: u32, c: u32) {
        self.store(alf as usize, GREEN);
        let affixes = self.affixes(alf);
        for (i, &v) in affixes.iter().enumerate() {
            self.close(v, self.affix_off(i));
        }
        let (p, q) = self.close(4 * c as usize, self.cloff);
        for r in p..q {
            let other = self.mem[r];
            if other != alf {
                self.red(other, c);
            }
        }
    }
}
