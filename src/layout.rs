//! Spreads the crowd out across the stands.

use std::fmt;

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Category, SpriteType},
    constants::geometry::{JITTER, LEFT_MARGIN, RIGHT_MARGIN},
    error::{Error, Result},
};

/// Identifies one fan for the life of a layout. Regenerating the crowd reuses ids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One fan (or couple) in the stands.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AudienceMember {
    pub id: MemberId,
    /// Horizontal position in scroll-space. Fixed once generated.
    pub x: f64,
    pub sprite_type: SpriteType,
    pub is_couple: bool,
    /// Whether a couple is currently reacting to being on the big screen.
    pub is_reacting: bool,
    /// Whether the live highlight pass has lit this fan up.
    pub is_highlighted: bool,
}

impl AudienceMember {
    fn new(id: u32, x: f64, sprite_type: SpriteType, is_couple: bool) -> Self {
        Self {
            id: MemberId(id),
            x,
            sprite_type,
            is_couple,
            is_reacting: false,
            is_highlighted: false,
        }
    }

    /// The art currently shown for this fan.
    pub fn shown_sprite(&self) -> SpriteType {
        if self.is_reacting {
            self.sprite_type.reaction()
        } else {
            self.sprite_type.clone()
        }
    }
}

/// Every type in `types` once (as far as `count` allows), then uniform picks with replacement for the rest.
fn required_types<R: Rng + ?Sized>(
    types: &[SpriteType],
    count: usize,
    category: Category,
    rng: &mut R,
) -> Result<Vec<SpriteType>> {
    if count == 0 {
        return Ok(vec![]);
    }
    if types.is_empty() {
        return Err(Error::NoSpriteTypes { category, count });
    }
    let mut out: Vec<_> = types.iter().take(count).cloned().collect();
    while out.len() < count {
        // `choose` only fails on empty slices, which was ruled out above
        if let Some(t) = types.choose(rng) {
            out.push(t.clone());
        }
    }
    Ok(out)
}

/// Evenly spaced slots across `range`, each jittered by up to [`JITTER`] of the spacing and kept off the edges.
fn positions<R: Rng + ?Sized>(count: usize, range: f64, rng: &mut R) -> Vec<f64> {
    let spacing = range / (count + 1) as f64;
    (0..count)
        .map(|i| {
            let base = spacing * (i + 1) as f64;
            let offset = rng.gen_range(-JITTER..=JITTER) * spacing;
            (base + offset).clamp(LEFT_MARGIN, range - RIGHT_MARGIN)
        })
        .collect()
}

/// Build a crowd of `audience_count` solo fans and `couple_count` couples spread across `scroll_range`.
///
/// Every solo type and every couple type shows up at least once, as long as the counts allow it. Positions and
/// types are shuffled independently before being paired up, so where a fan sits says nothing about who they are.
///
/// Fails if the crowd would be empty, if a non-zero count has no types to draw from, or if `scroll_range` isn't a
/// finite width big enough to fit between the edge margins.
pub fn generate<R: Rng + ?Sized>(
    audience_count: usize,
    couple_count: usize,
    scroll_range: f64,
    solo_types: &[SpriteType],
    couple_types: &[SpriteType],
    rng: &mut R,
) -> Result<Vec<AudienceMember>> {
    let total = audience_count + couple_count;
    if total == 0 {
        return Err(Error::EmptyAudience);
    }
    if !scroll_range.is_finite() || scroll_range < LEFT_MARGIN + RIGHT_MARGIN {
        return Err(Error::ScrollRangeTooSmall(scroll_range));
    }

    let mut types: Vec<(SpriteType, bool)> = Vec::with_capacity(total);
    types.extend(
        required_types(solo_types, audience_count, Category::Solo, rng)?
            .into_iter()
            .map(|t| (t, false)),
    );
    types.extend(
        required_types(couple_types, couple_count, Category::Couple, rng)?
            .into_iter()
            .map(|t| (t, true)),
    );

    let mut xs = positions(total, scroll_range, rng);
    xs.shuffle(rng);
    types.shuffle(rng);

    let members: Vec<_> = xs
        .into_iter()
        .zip(types)
        .enumerate()
        .map(|(i, (x, (sprite, is_couple)))| AudienceMember::new(i as u32, x, sprite, is_couple))
        .collect();
    tracing::debug!(
        members = members.len(),
        couples = couple_count,
        scroll_range,
        "audience generated"
    );
    Ok(members)
}

#[cfg(test)]
mod layout_test {
    use std::collections::BTreeSet;

    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::catalog::Catalog;

    fn generate_standard(seed: u64, solo: usize, couples: usize) -> Vec<AudienceMember> {
        let cat = Catalog::standard();
        let mut rng = SmallRng::seed_from_u64(seed);
        generate(solo, couples, 1800.0, &cat.solo, &cat.couples, &mut rng).expect("standard layout should build")
    }

    #[test]
    fn every_type_covered() {
        let cat = Catalog::standard();
        for seed in 0..20 {
            let crowd = generate_standard(seed, 11, 3);
            assert_eq!(crowd.len(), 14);
            let seen: BTreeSet<_> = crowd.iter().map(|m| m.sprite_type.clone()).collect();
            for t in cat.solo.iter().chain(cat.couples.iter()) {
                assert!(seen.contains(t), "seed {} missing {}", seed, t);
            }
        }
    }

    #[test]
    fn couple_flag_follows_type() {
        let cat = Catalog::standard();
        let crowd = generate_standard(7, 11, 3);
        for m in &crowd {
            assert_eq!(m.is_couple, cat.couples.contains(&m.sprite_type));
            assert!(!m.is_reacting);
            assert!(!m.is_highlighted);
        }
        assert_eq!(crowd.iter().filter(|m| m.is_couple).count(), 3);
    }

    #[test]
    fn extra_slots_filled_from_the_right_list() {
        let cat = Catalog::standard();
        let crowd = generate_standard(3, 20, 5);
        assert_eq!(crowd.len(), 25);
        for m in &crowd {
            if m.is_couple {
                assert!(cat.couples.contains(&m.sprite_type));
            } else {
                assert!(cat.solo.contains(&m.sprite_type));
            }
        }
    }

    #[test]
    fn budget_limits_coverage() {
        // only four solo slots: the first four types are the required ones
        let crowd = generate_standard(11, 4, 0);
        let seen: BTreeSet<_> = crowd.iter().map(|m| m.sprite_type.as_str().to_owned()).collect();
        let expect: BTreeSet<_> = ["man1", "man2", "man3", "man4"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expect);
    }

    #[test]
    fn positions_stay_off_the_edges() {
        for seed in 0..50 {
            for m in generate_standard(seed, 11, 3) {
                assert!(m.x >= 100.0 && m.x <= 1600.0, "seed {} put {} at {}", seed, m.id, m.x);
            }
        }
    }

    #[test]
    fn positions_stay_near_their_slots() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut xs = positions(14, 1800.0, &mut rng);
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let spacing = 1800.0 / 15.0;
        for (i, x) in xs.iter().enumerate() {
            let base = spacing * (i + 1) as f64;
            let lo = (base - spacing * JITTER).clamp(100.0, 1600.0);
            let hi = (base + spacing * JITTER).clamp(100.0, 1600.0);
            assert!(*x >= lo - 1e-9 && *x <= hi + 1e-9, "slot {} at {} not in [{}, {}]", i, x, lo, hi);
        }
    }

    #[test]
    fn same_seed_same_crowd() {
        assert_eq!(generate_standard(42, 11, 3), generate_standard(42, 11, 3));
    }

    #[test]
    fn ids_are_sequential() {
        let crowd = generate_standard(5, 11, 3);
        let ids: Vec<_> = crowd.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, (0..14).collect::<Vec<_>>());
    }

    #[test]
    fn empty_crowd_rejected() {
        let cat = Catalog::standard();
        let mut rng = SmallRng::seed_from_u64(0);
        let res = generate(0, 0, 1800.0, &cat.solo, &cat.couples, &mut rng);
        assert!(matches!(res, Err(Error::EmptyAudience)));
    }

    #[test]
    fn missing_couple_types_rejected() {
        let cat = Catalog::standard();
        let mut rng = SmallRng::seed_from_u64(0);
        let res = generate(5, 2, 1800.0, &cat.solo, &[], &mut rng);
        assert!(matches!(res, Err(Error::NoSpriteTypes { category: Category::Couple, count: 2 })));
    }

    #[test]
    fn no_couples_needs_no_couple_types() {
        let cat = Catalog::standard();
        let mut rng = SmallRng::seed_from_u64(0);
        let crowd = generate(5, 0, 1800.0, &cat.solo, &[], &mut rng).expect("solo-only crowd should build");
        assert_eq!(crowd.len(), 5);
    }

    #[test]
    fn tiny_range_rejected() {
        let cat = Catalog::standard();
        let mut rng = SmallRng::seed_from_u64(0);
        let res = generate(5, 0, 250.0, &cat.solo, &cat.couples, &mut rng);
        assert!(matches!(res, Err(Error::ScrollRangeTooSmall(_))));
    }

    #[test]
    fn unbounded_range_rejected() {
        let cat = Catalog::standard();
        let mut rng = SmallRng::seed_from_u64(0);
        for range in [f64::INFINITY, f64::NAN] {
            let res = generate(11, 3, range, &cat.solo, &cat.couples, &mut rng);
            assert!(matches!(res, Err(Error::ScrollRangeTooSmall(_))), "range {} accepted", range);
        }
    }

    #[test]
    fn reacting_member_shows_reaction_art() {
        let mut m = AudienceMember::new(0, 500.0, "cp1".into(), true);
        assert_eq!(m.shown_sprite().as_str(), "cp1");
        m.is_reacting = true;
        assert_eq!(m.shown_sprite().as_str(), "cp1_react");
    }
}
