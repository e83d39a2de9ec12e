//! Tests for tensor persistence

#[cfg(test)]
mod tests {
    use mazecorpus::MazeError;
    use mazecorpus::algorithm::corpus::build_corpus_seeded;
    use mazecorpus::io::tensor::{
        TensorDType, decode_mazes, encode_mazes, load_mazes, save_corpus, save_mazes,
    };
    use mazecorpus::spatial::grid::Grid;
    use serde_json::json;
    use tempfile::TempDir;

    fn tensor_bytes(header: &serde_json::Value, data: &[u8]) -> Vec<u8> {
        let header = header.to_string();
        let mut bytes = (header.len() as u64).to_le_bytes().to_vec();
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(data);
        bytes
    }

    fn is_invalid_tensor(result: &mazecorpus::Result<Vec<Grid>>) -> bool {
        matches!(result, Err(MazeError::InvalidTensorFile { .. }))
    }

    // Tests a persisted corpus reloads in the same order with the same cells
    #[test]
    fn test_save_and_load_corpus() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("6.5x3.safetensors");
        let corpus = build_corpus_seeded(6, 5, 3, 21).expect("corpus builds");

        save_corpus(&path, &corpus).expect("corpus saves");
        let loaded = load_mazes(&path).expect("corpus loads");

        assert_eq!(loaded.as_slice(), corpus.as_slice());
    }

    // Tests a corpus and its maze slice persist to identical bytes
    // Fails if the dense array export is not row-major per maze
    #[test]
    fn test_corpus_and_slice_files_match() {
        let dir = TempDir::new().expect("temp dir");
        let from_corpus = dir.path().join("corpus.safetensors");
        let from_slice = dir.path().join("slice.safetensors");
        let corpus = build_corpus_seeded(4, 6, 2, 5).expect("corpus builds");

        save_corpus(&from_corpus, &corpus).expect("corpus saves");
        save_mazes(&from_slice, corpus.as_slice()).expect("mazes save");

        assert_eq!(
            std::fs::read(&from_corpus).expect("corpus file reads"),
            std::fs::read(&from_slice).expect("slice file reads")
        );
    }

    // Tests a header whose shape overflows the byte count is rejected
    #[test]
    fn test_rejects_overflowing_shape() {
        let max = u64::MAX;
        for shape in [json!([0, max, 2]), json!([max, max, 1]), json!([2, 1, max])] {
            let header = json!({
                "mazes": {"dtype": "U8", "shape": shape, "data_offsets": [0, 0]}
            });
            assert!(is_invalid_tensor(&decode_mazes(&tensor_bytes(&header, &[]))));
        }
    }

    // Tests the header declares a U8 tensor with the corpus shape
    #[test]
    fn test_encoded_header() {
        let maze = Grid::from_rows(&[[1, 1, 1], [0, 0, 1]]).expect("valid rows");
        let flipped = Grid::from_rows(&[[0, 0, 0], [1, 1, 0]]).expect("valid rows");
        let bytes = encode_mazes(&[maze, flipped]).expect("mazes encode");

        let header_len = u64::from_le_bytes(
            bytes
                .get(..8)
                .and_then(|slice| slice.try_into().ok())
                .expect("length prefix"),
        ) as usize;
        let header: serde_json::Value =
            serde_json::from_slice(bytes.get(8..8 + header_len).expect("header bytes"))
                .expect("header is JSON");

        assert_eq!(header["mazes"]["dtype"], "U8");
        assert_eq!(header["mazes"]["shape"], json!([2, 2, 3]));
        assert_eq!(header["mazes"]["data_offsets"], json!([0, 12]));
        assert_eq!(header["__metadata__"]["width"], "3");
        assert_eq!(bytes.len(), 8 + header_len + 12);
        assert_eq!(
            bytes.get(8 + header_len..),
            Some([1, 1, 1, 0, 0, 1, 0, 0, 0, 1, 1, 0].as_slice())
        );
    }

    // Tests real-valued samples are binarized at 0.5
    #[test]
    fn test_decode_f32_binarizes() {
        let values: [f32; 4] = [0.9, 0.5, 0.51, -1.0];
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let header = json!({
            "mazes": {"dtype": "F32", "shape": [1, 2, 2], "data_offsets": [0, 16]}
        });

        let mazes = decode_mazes(&tensor_bytes(&header, &data)).expect("F32 decodes");

        let expected = Grid::from_rows(&[[1, 0], [1, 0]]).expect("valid rows");
        assert_eq!(mazes, vec![expected]);
    }

    // Tests U8 tensors must hold only 0 and 1
    #[test]
    fn test_rejects_non_binary_values() {
        let header = json!({
            "mazes": {"dtype": "U8", "shape": [1, 1, 3], "data_offsets": [0, 3]}
        });

        assert!(is_invalid_tensor(&decode_mazes(&tensor_bytes(
            &header,
            &[0, 2, 1]
        ))));
    }

    // Tests malformed files are rejected rather than partially loaded
    #[test]
    fn test_rejects_malformed_files() {
        let good = json!({
            "mazes": {"dtype": "U8", "shape": [1, 2, 2], "data_offsets": [0, 4]}
        });
        let truncated = tensor_bytes(&good, &[1, 1]);
        assert!(is_invalid_tensor(&decode_mazes(&truncated)));

        assert!(is_invalid_tensor(&decode_mazes(&[1, 2, 3])));
        assert!(is_invalid_tensor(&decode_mazes(&tensor_bytes(
            &json!({"other": good["mazes"].clone()}),
            &[1, 1, 0, 1]
        ))));
        assert!(is_invalid_tensor(&decode_mazes(&tensor_bytes(
            &json!({"mazes": {"dtype": "I64", "shape": [1, 2, 2], "data_offsets": [0, 32]}}),
            &[0; 32]
        ))));
        assert!(is_invalid_tensor(&decode_mazes(&tensor_bytes(
            &json!({"mazes": {"dtype": "U8", "shape": [4], "data_offsets": [0, 4]}}),
            &[1, 1, 0, 1]
        ))));
        assert!(is_invalid_tensor(&decode_mazes(&tensor_bytes(
            &json!({"mazes": {"dtype": "U8", "shape": [1, 2, 2], "data_offsets": [0, 3]}}),
            &[1, 1, 0, 1]
        ))));
    }

    // Tests saving requires at least one maze and a single shared size
    #[test]
    fn test_save_rejects_empty_and_mixed() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("bad.safetensors");

        assert!(save_mazes(&path, &[]).is_err());
        assert!(!path.exists());

        let small = Grid::from_rows(&[[1]]).expect("valid rows");
        let wide = Grid::from_rows(&[[1, 1]]).expect("valid rows");
        assert!(matches!(
            encode_mazes(&[small, wide]),
            Err(MazeError::InvalidParameter { .. })
        ));
    }

    // Tests a missing file reports the path that failed
    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.safetensors");

        assert!(matches!(
            load_mazes(&path),
            Err(MazeError::FileSystem { path: ref failed, .. }) if failed == &path
        ));
    }

    // Tests dtype names and widths
    #[test]
    fn test_dtype_names() {
        assert_eq!(TensorDType::from_name("U8"), Some(TensorDType::U8));
        assert_eq!(TensorDType::from_name("F32"), Some(TensorDType::F32));
        assert_eq!(TensorDType::from_name("f32"), None);
        assert_eq!(TensorDType::F32.bytes_per_element(), 4);
        assert_eq!(TensorDType::U8.name(), "U8");
    }
}
