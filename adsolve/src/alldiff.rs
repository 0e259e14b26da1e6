// Adaptive Search
// Copyright (C) 2002-2011 Daniel Diaz, Philippe Codognet and Salvador Abreu
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # All-Different propagator
//!
//! A small constraint propagator over [`BitSet`] domains, grounded on `qwh.c`'s
//! `All_Diff_Init`/`All_Diff_Tell_Domain`/`All_Diff_Tell_Value`/`All_Diff_Undo`/
//! `All_Diff_Do_Propagation`. Variables are partitioned into *groups* (a quasigroup's rows and
//! columns, for [`crate::problems::qwh::Qwh`]); within a group, no two variables may settle on the
//! same value.
//!
//! Each [`AllDiff::init_session`] opens an undo scope: the first narrowing of a variable's domain
//! within that scope is saved, and [`AllDiff::undo`] restores every variable touched since then.
//! This mirrors the `save_timestamp < timestamp` gate of the original rather than a full
//! domain-stack: at most one saved copy per variable per session, regardless of how many times it
//! is narrowed further within that same session.

use crate::bitset::BitSet;

/// Result of narrowing a single variable's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TellOutcome {
    /// The new domain equals the old one; nothing was recorded.
    Unchanged,
    /// The domain shrank but still has more than one candidate.
    Narrowed,
    /// The domain shrank to exactly one candidate.
    BoundToSingleton(usize),
    /// The domain shrank to nothing: the instance (as currently constrained) is unsatisfiable.
    Failed,
}

/// An all-different constraint network: one domain per variable, grouped into cliques that must
/// take pairwise-distinct values.
pub struct AllDiff {
    timestamp: u32,
    domain: Vec<BitSet>,
    domain_sav: Vec<BitSet>,
    save_timestamp: Vec<u32>,
    groups: Vec<Vec<usize>>,
    var_groups: Vec<Vec<usize>>,
    /// Union of each group member's domain as it stood at construction time: the set of values
    /// that group is actually responsible for placing, fixed for the propagator's lifetime so a
    /// value narrowed away from every member later is still recognized as a pigeonhole failure
    /// rather than silently dropped from consideration.
    group_universe: Vec<BitSet>,
}

impl AllDiff {
    /// Build a propagator over `domains.len()` variables, with the given membership groups (each
    /// a list of variable indices that must be pairwise distinct).
    pub fn new(domains: Vec<BitSet>, groups: Vec<Vec<usize>>) -> Self {
        let n = domains.len();
        let mut var_groups = vec![Vec::new(); n];
        for (gid, group) in groups.iter().enumerate() {
            for &i in group {
                var_groups[i].push(gid);
            }
        }
        let group_universe = groups
            .iter()
            .map(|group| group.iter().fold(BitSet::EMPTY, |acc, &i| acc | domains[i]))
            .collect();
        AllDiff {
            timestamp: 0,
            domain: domains,
            domain_sav: vec![BitSet::EMPTY; n],
            save_timestamp: vec![0; n],
            groups,
            var_groups,
            group_universe,
        }
    }

    /// Number of variables tracked.
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    /// Current domain of variable `i`.
    pub fn domain(&self, i: usize) -> BitSet {
        self.domain[i]
    }

    /// Overwrite variable `i`'s domain unconditionally, outside of any undo session. Used only
    /// while building the initial constraint network, never while a session is open.
    pub fn reset_domain(&mut self, i: usize, d: BitSet) {
        self.domain[i] = d;
    }

    /// Start a new undo session: the next narrowing of each variable is saved once, lazily, the
    /// first time it happens in this session (`All_Diff_Init`).
    pub fn init_session(&mut self) {
        self.timestamp += 1;
    }

    fn save_if_needed(&mut self, i: usize) {
        if self.save_timestamp[i] < self.timestamp {
            self.domain_sav[i] = self.domain[i];
            self.save_timestamp[i] = self.timestamp;
        }
    }

    /// Intersect variable `i`'s domain with `allowed`.
    pub fn tell_domain(&mut self, i: usize, allowed: BitSet) -> TellOutcome {
        let new = self.domain[i].intersect(allowed);
        if new == self.domain[i] {
            return TellOutcome::Unchanged;
        }
        self.save_if_needed(i);
        self.domain[i] = new;
        if new.is_empty() {
            TellOutcome::Failed
        } else if new.cardinality() == 1 {
            TellOutcome::BoundToSingleton(new.first().expect("cardinality 1 implies a member"))
        } else {
            TellOutcome::Narrowed
        }
    }

    /// Bind variable `i` to the single value `v`.
    pub fn tell_value(&mut self, i: usize, v: usize) -> TellOutcome {
        let mut singleton = BitSet::EMPTY;
        singleton.set(v);
        self.tell_domain(i, singleton)
    }

    /// Undo every domain narrowed during the current session, restoring each to its value at the
    /// start of the session (`All_Diff_Undo`). Does not close the session; call
    /// [`AllDiff::init_session`] again before telling anything new.
    pub fn undo(&mut self) {
        for i in 0..self.domain.len() {
            if self.save_timestamp[i] == self.timestamp {
                self.domain[i] = self.domain_sav[i];
            }
        }
    }

    /// One pass of value-consistency / forward checking: for every variable already bound to a
    /// singleton, remove that value from every other variable sharing one of its groups.
    /// Returns `Err(())` on failure (a domain went empty), `Ok(true)` if anything changed.
    fn forward_check_pass(&mut self) -> Result<bool, ()> {
        let mut changed = false;
        for i in 0..self.domain.len() {
            if self.domain[i].cardinality() != 1 {
                continue;
            }
            let v = self.domain[i].first().expect("cardinality 1 implies a member");
            for gid in self.var_groups[i].clone() {
                for j in self.groups[gid].clone() {
                    if j == i || !self.domain[j].has(v) {
                        continue;
                    }
                    let mut allowed = self.domain[j];
                    allowed.reset(v);
                    match self.tell_domain(j, allowed) {
                        TellOutcome::Failed => return Err(()),
                        TellOutcome::Unchanged => {}
                        _ => changed = true,
                    }
                }
            }
        }
        Ok(changed)
    }

    /// One pass of "hidden single" channeling: within a group, a value held by only one
    /// variable's domain must be taken by that variable (the row/column channeling passes of the
    /// original, unified here since both scan the same way over their respective groups). A value
    /// the group started out responsible for but that no member can reach any more is a
    /// pigeonhole failure.
    fn hidden_single_pass(&mut self) -> Result<bool, ()> {
        let mut changed = false;
        for gid in 0..self.groups.len() {
            let group = self.groups[gid].clone();
            for v in self.group_universe[gid].iter() {
                let mut holder = None;
                let mut count = 0u32;
                for &i in &group {
                    if self.domain[i].has(v) {
                        count += 1;
                        holder = Some(i);
                    }
                }
                if count == 0 {
                    return Err(());
                }
                if count == 1 {
                    let i = holder.expect("count == 1 implies a holder");
                    if self.domain[i].cardinality() > 1 {
                        match self.tell_value(i, v) {
                            TellOutcome::Failed => return Err(()),
                            TellOutcome::Unchanged => {}
                            _ => changed = true,
                        }
                    }
                }
            }
        }
        Ok(changed)
    }

    /// Run forward checking and hidden-single channeling to a fixed point
    /// (`All_Diff_Do_Propagation`). Returns `false` if the network is inconsistent (some domain
    /// emptied); the caller should then [`AllDiff::undo`] rather than trust the domains.
    pub fn do_propagation(&mut self) -> bool {
        loop {
            match self.forward_check_pass() {
                Err(()) => return false,
                Ok(true) => continue,
                Ok(false) => {}
            }
            match self.hidden_single_pass() {
                Err(()) => return false,
                Ok(true) => continue,
                Ok(false) => break,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(order: usize) -> BitSet {
        BitSet::full(order)
    }

    #[test]
    fn tell_value_binds_and_reports_singleton() {
        let mut ad = AllDiff::new(vec![full(3); 3], vec![vec![0, 1, 2]]);
        ad.init_session();
        let outcome = ad.tell_value(0, 1);
        assert_eq!(outcome, TellOutcome::BoundToSingleton(1));
        assert_eq!(ad.domain(0).cardinality(), 1);
    }

    #[test]
    fn forward_checking_propagates_singleton_across_group() {
        let mut ad = AllDiff::new(vec![full(3); 3], vec![vec![0, 1, 2]]);
        ad.init_session();
        ad.tell_value(0, 1);
        assert!(ad.do_propagation());
        assert!(!ad.domain(1).has(1));
        assert!(!ad.domain(2).has(1));
    }

    #[test]
    fn propagation_to_failure_is_reported() {
        // Three pairwise-distinct variables squeezed into a 2-value domain: a pigeonhole clash.
        let mut ad = AllDiff::new(vec![full(2); 3], vec![vec![0, 1, 2]]);
        ad.init_session();
        ad.tell_value(0, 0);
        ad.tell_value(1, 1);
        assert!(!ad.do_propagation());
        ad.undo();
        assert_eq!(ad.domain(2), full(2));
    }

    #[test]
    fn undo_restores_domains_from_the_session_start() {
        let mut ad = AllDiff::new(vec![full(3); 2], vec![vec![0, 1]]);
        ad.init_session();
        ad.tell_value(0, 0);
        assert_eq!(ad.domain(0).cardinality(), 1);
        ad.undo();
        assert_eq!(ad.domain(0), full(3));
    }

    #[test]
    fn a_value_narrowed_out_of_every_group_member_is_a_pigeonhole_failure() {
        // Two variables, both still multi-valued (so forward checking sees no singleton to
        // propagate from), but value 2 has been told away from both: nobody in the group can
        // still place it.
        let mut ad = AllDiff::new(vec![full(3); 2], vec![vec![0, 1]]);
        ad.init_session();
        let mut allowed = full(3);
        allowed.reset(2);
        ad.tell_domain(0, allowed);
        ad.tell_domain(1, allowed);
        assert!(!ad.do_propagation());
    }

    #[test]
    fn hidden_single_binds_the_only_holder_of_a_value() {
        let mut d0 = full(3);
        d0.reset(2);
        let mut d1 = full(3);
        d1.reset(2);
        let d2 = full(3); // only d2 can still take value 2
        let mut ad = AllDiff::new(vec![d0, d1, d2], vec![vec![0, 1, 2]]);
        ad.init_session();
        assert!(ad.do_propagation());
        assert_eq!(ad.domain(2), {
            let mut s = BitSet::EMPTY;
            s.set(2);
            s
        });
    }
}
