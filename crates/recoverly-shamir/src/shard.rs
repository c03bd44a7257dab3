//! Shard provenance for backup, reshare and rotation
//!
//! A `Shard` wraps a share point with the metadata the policy layer needs:
//! owning session, threshold of its set, policy revision, and the chain of
//! ancestors it was reshared from. Resharing splits an existing shard's
//! value without ever touching the original secret; recovery collapses the
//! chains bottom-up until the root secret falls out.

use crate::{recover_secret, PrimeField, SecretSharer, SharePoint, SharingError};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// One level of reshare lineage: the parent's x-coordinate and the
/// threshold of the set the parent belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ancestor {
    pub x: BigUint,
    pub threshold: usize,
}

/// A shard with provenance metadata.
///
/// Shards are immutable: a policy change produces a new set at a higher
/// revision, it never rewrites existing shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shard {
    /// Identifier of the secret/session this shard belongs to
    pub session_id: String,
    /// The share point; `point.x` is the participant identifier
    pub point: SharePoint,
    /// Threshold of the shard-set this shard is part of
    pub threshold: usize,
    /// Policy revision that produced this shard (root sets start at 0,
    /// each reshare adds 1)
    pub revision: u32,
    /// Reshare lineage, oldest first; empty for a root shard
    pub ancestors: Vec<Ancestor>,
}

impl Shard {
    /// Split a fresh secret into a root shard-set at revision 0.
    pub fn root_set<R: RngCore + CryptoRng>(
        session_id: &str,
        secret: &BigUint,
        threshold: usize,
        participant_xs: &[BigUint],
        field: &PrimeField,
        rng: &mut R,
    ) -> Result<Vec<Shard>, SharingError> {
        let sharer = SecretSharer::split(secret, threshold, participant_xs, field, rng)?;
        Ok(sharer
            .into_shards()
            .into_iter()
            .map(|point| Shard {
                session_id: session_id.to_string(),
                point,
                threshold,
                revision: 0,
                ancestors: Vec::new(),
            })
            .collect())
    }

    /// The participant identifier (the point's x-coordinate).
    pub fn participant_id(&self) -> &BigUint {
        &self.point.x
    }

    /// How many reshare levels sit above this shard.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Split this shard's value into child shards.
    ///
    /// The children record this shard as their newest ancestor and carry
    /// the next policy revision. Recovering exactly `threshold` children
    /// re-derives this shard's value without touching the root secret.
    pub fn reshare<R: RngCore + CryptoRng>(
        &self,
        threshold: usize,
        participant_xs: &[BigUint],
        field: &PrimeField,
        rng: &mut R,
    ) -> Result<Vec<Shard>, SharingError> {
        let sharer = SecretSharer::split(&self.point.y, threshold, participant_xs, field, rng)?;
        let mut ancestors = self.ancestors.clone();
        ancestors.push(Ancestor {
            x: self.point.x.clone(),
            threshold: self.threshold,
        });
        Ok(sharer
            .into_shards()
            .into_iter()
            .map(|point| Shard {
                session_id: self.session_id.clone(),
                point,
                threshold,
                revision: self.revision + 1,
                ancestors: ancestors.clone(),
            })
            .collect())
    }
}

/// Recover the root secret from a mix of shards at arbitrary reshare
/// depths.
///
/// Explicit-worklist recovery, bottom-up: the deepest shards are grouped
/// by their lineage, each complete group is collapsed into its parent
/// shard, and the loop repeats until only root-level shards remain. Every
/// group must be exactly its threshold in size with consistent metadata;
/// anything else fails loudly rather than interpolating a wrong value.
pub fn recover_root(shards: &[Shard], field: &PrimeField) -> Result<BigUint, SharingError> {
    if shards.is_empty() {
        return Err(SharingError::InvalidParameters(
            "No shards supplied".into(),
        ));
    }
    let session = &shards[0].session_id;
    if shards.iter().any(|s| &s.session_id != session) {
        return Err(SharingError::InvalidShard(
            "Shards belong to different sessions".into(),
        ));
    }

    let mut pool: Vec<Shard> = shards.to_vec();
    loop {
        let depth = pool.iter().map(Shard::depth).max().unwrap_or(0);
        if depth == 0 {
            return recover_level(&pool, field);
        }

        let (deepest, mut rest): (Vec<Shard>, Vec<Shard>) =
            pool.into_iter().partition(|s| s.depth() == depth);

        for group in group_by_lineage(deepest) {
            let parent = collapse_group(&group, field)?;
            rest.push(parent);
        }
        pool = rest;
    }
}

/// Recover a single same-level shard-set (used at the root).
fn recover_level(shards: &[Shard], field: &PrimeField) -> Result<BigUint, SharingError> {
    let threshold = shards[0].threshold;
    check_consistent(shards)?;
    let points: Vec<SharePoint> = shards.iter().map(|s| s.point.clone()).collect();
    recover_secret(&points, threshold, field)
}

/// Collapse one complete sibling group into its parent shard.
fn collapse_group(group: &[Shard], field: &PrimeField) -> Result<Shard, SharingError> {
    check_consistent(group)?;
    let template = &group[0];
    let parent_meta = template
        .ancestors
        .last()
        .expect("Grouped shards always have ancestry")
        .clone();

    let points: Vec<SharePoint> = group.iter().map(|s| s.point.clone()).collect();
    let y = recover_secret(&points, template.threshold, field)?;

    let revision = template.revision.checked_sub(1).ok_or_else(|| {
        SharingError::InvalidShard("Reshared shard cannot be at revision 0".into())
    })?;

    Ok(Shard {
        session_id: template.session_id.clone(),
        point: SharePoint {
            x: parent_meta.x,
            y,
        },
        threshold: parent_meta.threshold,
        revision,
        ancestors: template.ancestors[..template.ancestors.len() - 1].to_vec(),
    })
}

/// All shards of one set must agree on threshold and revision.
fn check_consistent(shards: &[Shard]) -> Result<(), SharingError> {
    let threshold = shards[0].threshold;
    let revision = shards[0].revision;
    if shards
        .iter()
        .any(|s| s.threshold != threshold || s.revision != revision)
    {
        return Err(SharingError::InvalidShard(
            "Shards of one set disagree on threshold or revision".into(),
        ));
    }
    Ok(())
}

/// Partition shards into sibling groups sharing an identical full lineage.
fn group_by_lineage(shards: Vec<Shard>) -> Vec<Vec<Shard>> {
    let mut groups: Vec<Vec<Shard>> = Vec::new();
    for shard in shards {
        match groups
            .iter_mut()
            .find(|g| g[0].ancestors == shard.ancestors)
        {
            Some(group) => group.push(shard),
            None => groups.push(vec![shard]),
        }
    }
    groups
}
