//! Sharded ceremony scenario: a ceremony too large for one shard is split
//! across several, and the manifest set validates once all shards exist.

use ark_bn254::Fr;
use ark_std::UniformRand;

use tau_ceremony::driver::{create_initial, plan_initial};
use tau_ceremony::multicore::Worker;
use tau_ceremony::secret::Secret;
use tau_ceremony::transcript::read_transcript;
use tau_ceremony::verifier::validate_manifest_set;

#[test]
fn three_shard_ceremony_validates_as_a_set() {
    let planned = plan_initial(17, 5, 8);
    assert_eq!(
        planned.iter().map(|m| m.num_g1_points).collect::<Vec<_>>(),
        vec![8, 8, 1]
    );
    assert_eq!(
        planned.iter().map(|m| m.num_g2_points).collect::<Vec<_>>(),
        vec![5, 0, 0]
    );

    let dir = tempfile::tempdir().unwrap();
    let worker = Worker::new();
    let y = Fr::rand(&mut rand::thread_rng());
    let secret = Secret::from_scalar(y);

    let mut sink = Vec::new();
    let outputs = create_initial(dir.path(), &worker, 17, 5, 8, &secret, &mut sink).unwrap();
    assert_eq!(outputs.len(), 3);

    let manifests: Vec<_> = outputs
        .iter()
        .map(|o| read_transcript(&o.path).unwrap().0)
        .collect();
    // shard 0 carries the genesis anchor, so its G2 count is one more than planned.
    assert_eq!(manifests[0].num_g2_points, 6);
    assert_eq!(manifests[1].num_g2_points, 0);

    assert!(validate_manifest_set(&manifests, 17, 5).is_ok());
}
