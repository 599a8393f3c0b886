/// Concatenates supplied slices into one continuous vector.
macro_rules! concat_slices {
    ($($slice: expr),+) => {
        [$(&$slice[..]),+].concat()
    }
}

/// Checks canonical (compressed and uncompressed), JSON and MessagePack serialization of an object
#[cfg(test)]
macro_rules! test_serialization {
    ($obj_type:ty, $obj: expr) => {
        let mut serz = vec![];
        ark_serialize::CanonicalSerialize::serialize_compressed(&$obj, &mut serz).unwrap();
        let deserz: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_compressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);

        let mut serz = vec![];
        ark_serialize::CanonicalSerialize::serialize_uncompressed(&$obj, &mut serz).unwrap();
        let deserz: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_uncompressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);

        // Test JSON serialization
        let ser = serde_json::to_string(&$obj).unwrap();
        let deser = serde_json::from_str::<$obj_type>(&ser).unwrap();
        assert_eq!($obj, deser);

        // Test Message Pack serialization
        let ser = rmp_serde::to_vec_named(&$obj).unwrap();
        let deser = rmp_serde::from_slice::<$obj_type>(&ser).unwrap();
        assert_eq!($obj, deser);
    };
}
