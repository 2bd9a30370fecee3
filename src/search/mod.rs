//! Backtracking driver for the four-letter commafree code search,
//! Algorithm C of TAOCP Volume 4 Fascicle 5 §7.2.2.
//!
//! The search assigns at most one word per 4-cycle class, level by level.
//! Committing a word closes its prefix/suffix buckets and queues six
//! cross-matched (prefix, suffix) bucket pairs on the poison list; the
//! ensuing sweep either empties the list, reddens the open side of every
//! half-closed pair, or finds a fully closed pair and rejects the word.
//! All table writes are journaled, so abandoning a level rewinds in time
//! proportional to the changes it made.

mod table;

use crate::preprime::preprimes;
use crate::{Error, Word};
use log::{debug, trace};
use table::Table;
#[cfg(debug_assertions)]
use table::{BLUE, GREEN, RED};

/// Largest possible code size for alphabet size `m`: the number of
/// 4-cycle classes, (m^4 - m^2) / 4.
pub fn max_code_size(m: usize) -> usize {
    let m2 = m * m;
    (m2 * m2 - m2) / 4
}

fn alpha(m: usize, word: Word) -> u32 {
    let m = m as u32;
    word.iter().fold(0, |a, &d| a * m + u32::from(d))
}

#[derive(Debug)]
enum State {
    Enter,
    Try,
    Commit,
    Retry,
    Retreat,
    Done,
}

/// Exhaustive search for commafree codes of block length four over the
/// alphabet `0..m`.
///
/// Iterating yields every code the backtracking procedure visits, in
/// depth-first order; each code is a vector of at least `g` words, listed
/// in the order the levels committed them. The search is deterministic
/// and owns all of its state; dropping the iterator abandons it.
#[derive(Debug)]
pub struct Search {
    table: Table,
    /// alpha -> word digits, filled for the words of the 4-cycle classes.
    alf: Vec<Word>,
    /// alpha -> class id.
    alfc: Vec<u32>,
    /// Permutation of class ids; the first `f` are still free.
    free: Vec<u32>,
    ifree: Vec<u32>,
    /// Per-level trial word (alpha, or -1 for the no-word move).
    xs: Vec<i32>,
    /// Per-level class of the trial word.
    cs: Vec<u32>,
    /// Per-level slack after the move.
    ss: Vec<u32>,
    /// Per-level journal watermark at entry.
    us: Vec<usize>,
    level: usize,
    f: usize,
    s: u32,
    x: i32,
    c: u32,
    classes: usize,
    state: State,
}

impl Search {
    /// Set up the search for codes of at least `g` words over the
    /// alphabet `0..m`.
    ///
    /// `m` must lie in `2..=7` and `g` in `L - m(m-1) ..= L`, where
    /// `L = (m^4 - m^2) / 4` is the number of 4-cycle classes and the
    /// largest possible code size.
    pub fn new(m: usize, g: usize) -> Result<Search, Error> {
        if m < 2 || m > 7 {
            return Err(Error::AlphabetSize(m));
        }
        let classes = max_code_size(m);
        let min = classes - m * (m - 1);
        if g < min || g > classes {
            return Err(Error::Goal {
                m,
                goal: g,
                min,
                max: classes,
            });
        }

        let m4 = m * m * m * m;
        let mut table = Table::new(m);
        let mut alf = vec![[0; 4]; m4];
        let mut alfc = vec![0; m4];

        // the two symmetric duplicates that never enter the blue set
        let excluded = [alpha(m, [0, 1, 0, 0]), alpha(m, [1, 0, 0, 0])];

        let reps = preprimes(m, 4).filter(|&(_, j)| j == 4);
        for (cl, (rep, _)) in reps.enumerate() {
            table.init_class(cl);
            let mut word: Word = [rep[0], rep[1], rep[2], rep[3]];
            for _ in 0..4 {
                let a = alpha(m, word);
                alf[a as usize] = word;
                alfc[a as usize] = cl as u32;
                if !excluded.contains(&a) {
                    table.enroll(a, cl as u32);
                }
                word = [word[1], word[2], word[3], word[0]];
            }
        }

        debug!(
            "search: m={}, g={}, {} classes over {} candidate words",
            m,
            g,
            classes,
            m4 - m * m - 2
        );

        Ok(Search {
            table,
            alf,
            alfc,
            free: (0..classes as u32).collect(),
            ifree: (0..classes as u32).collect(),
            xs: vec![0; classes],
            cs: vec![0; classes],
            ss: vec![0; classes],
            us: vec![0; classes],
            level: 0,
            f: classes,
            s: (classes - g) as u32,
            x: 0,
            c: 0,
            classes,
            state: State::Enter,
        })
    }

    /// Choose the next trial word: scan the free classes for the fewest
    /// remaining blue words, then let the poison list promote a word
    /// whose commitment would force the most reddening.
    fn select(&mut self) {
        let alfc = &self.alfc;
        let t = &mut self.table;
        let m4 = t.m4;

        let mut r = 5;
        let mut cl = 0;
        for k in 0..self.f {
            let cls = self.free[k];
            let head = t.cloff + 4 * cls as usize;
            let n = t.mem[head + m4] - head as u32;
            if n < r {
                r = n;
                cl = cls;
                if r == 0 {
                    break;
                }
            }
        }

        let mut x: i32 = -1;
        if r > 0 {
            x = t.mem[t.cloff + 4 * cl as usize] as i32;
        }
        if r > 1 {
            // sweep the poison pairs for the largest bucket facing a
            // smaller open one; a word on the smaller side then kills
            // the whole larger side when committed
            let mut q = 0;
            let mut p = t.poison;
            let mut pp = t.mem[t.pp] as usize;
            while p < pp {
                let y = t.mem[p] as usize;
                let z = t.mem[p + 1] as usize;
                let yt = t.mem[y + m4] as usize;
                let zt = t.mem[z + m4] as usize;

                if y == yt || z == zt {
                    // a dead pair; swap the last pair into its place
                    pp -= 2;
                    if p != pp {
                        let (a, b) = (t.mem[pp], t.mem[pp + 1]);
                        t.store(p, a);
                        t.store(p + 1, b);
                    }
                } else {
                    debug_assert!(yt > y && zt > z);
                    let ylen = (yt - y) as u32;
                    let zlen = (zt - z) as u32;
                    if ylen >= zlen && ylen > q {
                        q = ylen;
                        x = t.mem[z] as i32;
                        cl = alfc[x as usize];
                    } else if ylen < zlen && zlen > q {
                        q = zlen;
                        x = t.mem[y] as i32;
                        cl = alfc[x as usize];
                    }
                    p += 2;
                }
            }
            t.store(t.pp, pp as u32);
        }

        self.x = x;
        self.c = cl;
    }

    /// Commit the trial word: make it green, append the six cross-matched
    /// poison pairs, and sweep the poison list. Returns false when the
    /// sweep finds a fully closed pair, i.e. the word is infeasible.
    fn try_word(&mut self) -> bool {
        let alfc = &self.alfc;
        let t = &mut self.table;
        let m4 = t.m4;
        let x = self.x as u32;

        t.green(x, self.c);

        // a length-i prefix of the new green word conflicts with every
        // word sharing its length-(4-i) suffix at an interior overlap,
        // and symmetrically; hence the affix cross-matching
        let [p1, p2, p3, s1, s2, s3] = t.affixes(x);
        let mut pp = t.mem[t.pp] as usize + 6;
        t.store(pp - 6, (t.affix_off(3) + p1) as u32);
        t.store(pp - 5, (t.affix_off(2) + s3) as u32);
        t.store(pp - 4, (t.affix_off(4) + p2) as u32);
        t.store(pp - 3, (t.affix_off(1) + s2) as u32);
        t.store(pp - 2, (t.affix_off(5) + p3) as u32);
        t.store(pp - 1, (t.affix_off(0) + s1) as u32);

        let mut p = t.poison;
        let mut feasible = true;
        while p < pp {
            let y = t.mem[p] as usize;
            let z = t.mem[p + 1] as usize;
            let yt = t.mem[y + m4] as usize;
            let zt = t.mem[z + m4] as usize;

            if y == yt || z == zt {
                // one side already empty; drop the pair
                pp -= 2;
                if p != pp {
                    let (a, b) = (t.mem[pp], t.mem[pp + 1]);
                    t.store(p, a);
                    t.store(p + 1, b);
                }
            } else if yt < y && zt < z {
                // both sides closed: the word is poisoned
                feasible = false;
                break;
            } else if yt > y && zt > z {
                p += 2;
            } else {
                // exactly one side closed; every blue word on the open
                // side dies. Emptying the open side first freezes its
                // cells against the removals below.
                let (open, tail) = if yt < y { (z, zt) } else { (y, yt) };
                t.store(open + m4, open as u32);
                for k in open..tail {
                    let dead = t.mem[k];
                    t.red(dead, alfc[dead as usize]);
                }
                pp -= 2;
                if p != pp {
                    let (a, b) = (t.mem[pp], t.mem[pp + 1]);
                    t.store(p, a);
                    t.store(p + 1, b);
                }
            }
        }
        t.store(t.pp, pp as u32);

        feasible
    }

    fn code(&self) -> Vec<Word> {
        self.xs
            .iter()
            .filter(|&&x| x >= 0)
            .map(|&x| self.alf[x as usize])
            .collect()
    }

    /// Debug-build consistency pass over the whole table, run after every
    /// committed transition.
    #[cfg(debug_assertions)]
    fn validate(&self) {
        let t = &self.table;
        let m = t.m;
        let m4 = t.m4;

        // colors are well-formed, the green count matches the line of
        // committed moves, and no free class retains a green member
        let mut greens = 0;
        for a in 0..m4 {
            let color = t.mem[a];
            debug_assert!(color == RED || color == BLUE || color == GREEN);
            if color == GREEN {
                greens += 1;
                let cls = self.alfc[a] as usize;
                debug_assert!(self.ifree[cls] as usize >= self.f);
            }
        }
        let committed = self.xs[..self.level].iter().filter(|&&x| x >= 0).count();
        debug_assert_eq!(greens, committed);

        // every open bucket holds blue words agreeing with the inverted
        // index
        let m2 = m * m;
        let m3 = m2 * m;
        let strides = [m3, m2, m, m3, m2, m];
        for (i, &stride) in strides.iter().enumerate() {
            let base = t.affix_off(i);
            let mut v = 0;
            while v < m4 {
                self.validate_bucket(base + v, base);
                v += stride;
            }
        }
        for cl in 0..self.classes {
            self.validate_bucket(t.cloff + 4 * cl, t.cloff);
        }
    }

    #[cfg(debug_assertions)]
    fn validate_bucket(&self, head: usize, base: usize) {
        let t = &self.table;
        let tail = t.mem[head + t.m4] as usize;
        if tail < head {
            // closed; contents are frozen and may be stale
            return;
        }
        for k in head..tail {
            let w = t.mem[k] as usize;
            debug_assert_eq!(t.mem[w], BLUE);
            debug_assert_eq!(t.mem[base - t.m4 + w] as usize, k);
        }
    }
}

impl Iterator for Search {
    type Item = Vec<Word>;

    fn next(&mut self) -> Option<Vec<Word>> {
        loop {
            match self.state {
                // C2: enter a level, or visit a full assignment
                State::Enter => {
                    if self.level == self.classes {
                        trace!("visit {:?}", &self.xs);
                        self.state = State::Retreat;
                        return Some(self.code());
                    }
                    self.select();
                    self.state = State::Try;
                }

                // C3: try the candidate
                State::Try => {
                    self.us[self.level] = self.table.mark();
                    self.table.bump();
                    if self.x < 0 {
                        // the no-word move is only open while slack
                        // remains, and never at the root
                        if self.s == 0 || self.level == 0 {
                            self.state = State::Retreat;
                        } else {
                            self.s -= 1;
                            self.state = State::Commit;
                        }
                    } else if self.try_word() {
                        self.state = State::Commit;
                    } else {
                        self.state = State::Retry;
                    }
                }

                // C4: make the move
                State::Commit => {
                    self.xs[self.level] = self.x;
                    self.cs[self.level] = self.c;
                    self.ss[self.level] = self.s;

                    // swap-delete class c from the free permutation
                    let p = self.ifree[self.c as usize] as usize;
                    self.f -= 1;
                    if p != self.f {
                        let y = self.free[self.f];
                        self.free[p] = y;
                        self.ifree[y as usize] = p as u32;
                        self.free[self.f] = self.c;
                        self.ifree[self.c as usize] = self.f as u32;
                    }

                    self.level += 1;
                    #[cfg(debug_assertions)]
                    self.validate();
                    self.state = State::Enter;
                }

                // C5: rewind the level, redden the candidate, try again
                State::Retry => {
                    self.table.rewind(self.us[self.level]);
                    self.table.bump();
                    self.table.red(self.x as u32, self.c);
                    #[cfg(debug_assertions)]
                    self.validate();
                    self.state = State::Enter;
                }

                // C6: retreat
                State::Retreat => {
                    if self.level == 0 {
                        trace!("search exhausted");
                        self.state = State::Done;
                        return None;
                    }
                    self.level -= 1;
                    self.x = self.xs[self.level];
                    self.c = self.cs[self.level];
                    self.f += 1;
                    if self.x >= 0 {
                        self.s = self.ss[self.level];
                        self.state = State::Retry;
                    } else {
                        // a no-word level has nothing to redden; keep
                        // retreating (slack is restored by the first
                        // word level below)
                        #[cfg(debug_assertions)]
                        self.validate();
                    }
                }

                State::Done => return None,
            }
        }
    }
}
