/// Creates a group with `$member_count` members and one signature per member on its own digest
#[macro_export]
macro_rules! setup_group {
    ($rng: ident, $member_count: expr, $group: ident, $prepared: ident, $members: ident, $digests: ident, $sigs: ident) => {
        let $group = GroupKey::<Bls12_381>::generate_default(&mut $rng).unwrap();
        let $prepared = $group.public.prepare().unwrap();
        let $members = (0..$member_count)
            .map(|_| $group.issue_member(&mut $rng).unwrap())
            .collect::<Vec<_>>();
        let $digests = (0..$member_count)
            .map(|i| DigestAlgorithm::Sha256.digest(format!("message {}", i).as_bytes()))
            .collect::<Vec<_>>();
        let $sigs = $members
            .iter()
            .zip($digests.iter())
            .map(|(m, d)| m.sign(&mut $rng, d, &$prepared).unwrap())
            .collect::<Vec<_>>();
    };
}
