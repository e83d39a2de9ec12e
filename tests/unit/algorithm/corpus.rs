//! Tests for distinct corpus assembly

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use mazecorpus::MazeError;
    use mazecorpus::algorithm::corpus::{
        BuildProgress, CorpusBuilder, CorpusConfig, build_corpus, build_corpus_seeded,
        distinct_maze_upper_bound,
    };
    use mazecorpus::algorithm::validator::is_valid_maze;

    fn sequential() -> CorpusConfig {
        CorpusConfig {
            parallel: false,
            ..CorpusConfig::default()
        }
    }

    // Tests a small corpus holds the requested count of distinct valid mazes
    #[test]
    fn test_corpus_is_distinct_and_valid() {
        let corpus = build_corpus_seeded(5, 5, 5, 1).expect("corpus builds");

        assert_eq!(corpus.len(), 5);
        assert_eq!((corpus.width(), corpus.height()), (5, 5));
        assert!(corpus.iter().all(is_valid_maze));

        let distinct: HashSet<_> = corpus.iter().collect();
        assert_eq!(distinct.len(), 5);
    }

    // Tests a larger corpus of default-sized mazes stays pairwise distinct
    #[test]
    fn test_larger_corpus_is_distinct() {
        let corpus = build_corpus_seeded(200, 8, 8, 42).expect("corpus builds");

        let distinct: HashSet<_> = corpus.iter().map(|maze| maze.to_bits()).collect();
        assert_eq!(distinct.len(), 200);
        assert!(corpus.iter().all(|maze| maze.width() == 8 && maze.height() == 8));
    }

    // Tests the same seed reproduces the same corpus
    #[test]
    fn test_seeded_build_is_deterministic() {
        let first = build_corpus_seeded(20, 6, 4, 99).expect("corpus builds");
        let second = build_corpus_seeded(20, 6, 4, 99).expect("corpus builds");

        assert_eq!(first, second);
    }

    // Tests parallel and sequential builds agree for a seed
    // Fails if child seeds are drawn inside the parallel section
    #[test]
    fn test_parallel_matches_sequential() {
        let parallel = CorpusBuilder::new(5)
            .build(50, 7, 7)
            .expect("corpus builds");
        let single = CorpusBuilder::new(5)
            .with_config(sequential())
            .build(50, 7, 7)
            .expect("corpus builds");

        assert_eq!(parallel.as_slice(), single.as_slice());
    }

    // Tests certifying each candidate leaves the seeded corpus unchanged
    #[test]
    fn test_verification_does_not_change_output() {
        let checked = CorpusBuilder::new(31)
            .build(40, 6, 5)
            .expect("corpus builds");
        let unchecked = CorpusBuilder::new(31)
            .with_config(CorpusConfig {
                verify_candidates: false,
                ..CorpusConfig::default()
            })
            .build(40, 6, 5)
            .expect("corpus builds");

        assert_eq!(checked.as_slice(), unchecked.as_slice());
        assert!(unchecked.iter().all(is_valid_maze));
    }

    // Tests an entropy-seeded build still meets the quota
    #[test]
    fn test_unseeded_build() {
        let corpus = build_corpus(3, 4, 4).expect("corpus builds");

        assert_eq!(corpus.len(), 3);
    }

    // Tests a zero count or dimension is rejected before any work
    #[test]
    fn test_rejects_zero_parameters() {
        assert!(matches!(
            build_corpus_seeded(0, 8, 8, 1),
            Err(MazeError::InvalidDimensions {
                parameter: "count",
                value: 0
            })
        ));
        assert!(matches!(
            build_corpus_seeded(3, 0, 8, 1),
            Err(MazeError::InvalidDimensions {
                parameter: "width",
                ..
            })
        ));
        assert!(matches!(
            build_corpus_seeded(3, 8, 0, 1),
            Err(MazeError::InvalidDimensions {
                parameter: "height",
                ..
            })
        ));
    }

    // Tests dimensions whose cell count overflows fail instead of allocating
    #[test]
    fn test_rejects_overflowing_dimensions() {
        assert!(matches!(
            build_corpus_seeded(1, usize::MAX, 2, 1),
            Err(MazeError::InvalidParameter { .. })
        ));
    }

    // Tests a 1x1 grid admits exactly one maze
    #[test]
    fn test_single_cell_corpus() {
        let corpus = build_corpus_seeded(1, 1, 1, 0).expect("one maze exists");
        assert_eq!(corpus.len(), 1);

        assert!(matches!(
            build_corpus_seeded(2, 1, 1, 0),
            Err(MazeError::CorpusUnreachable {
                requested: 2,
                distinct: 1,
                attempts: 0
            })
        ));
    }

    // Tests every 2x2 maze can be collected but no more
    #[test]
    fn test_two_by_two_exhaustion() {
        let corpus = build_corpus_seeded(4, 2, 2, 8).expect("four L shapes exist");
        assert_eq!(corpus.len(), 4);

        assert!(matches!(
            build_corpus_seeded(5, 2, 2, 8),
            Err(MazeError::CorpusUnreachable { distinct: 4, .. })
        ));
    }

    // Tests a tight attempt cap stops the build instead of looping
    #[test]
    fn test_attempt_cap() {
        let config = CorpusConfig {
            max_attempts: Some(2),
            ..sequential()
        };
        let result = CorpusBuilder::new(1).with_config(config).build(5, 3, 3);

        assert!(matches!(
            result,
            Err(MazeError::CorpusUnreachable {
                requested: 5,
                attempts: 2,
                distinct
            }) if distinct <= 2
        ));
    }

    // Tests the derived attempt budget scales with the count and has a floor
    #[test]
    fn test_attempt_budget() {
        let config = CorpusConfig::default();

        assert_eq!(config.attempt_budget(5), 1_000);
        assert_eq!(config.attempt_budget(60_000), 600_000);
        assert_eq!(
            CorpusConfig {
                max_attempts: Some(7),
                ..config
            }
            .attempt_budget(60_000),
            7
        );
    }

    // Tests build counters stay consistent with the accepted mazes
    #[test]
    fn test_build_stats() {
        let corpus = build_corpus_seeded(4, 2, 2, 3).expect("corpus builds");
        let stats = corpus.stats();

        assert_eq!(stats.attempts, corpus.len() + stats.duplicates);
        assert!(stats.rounds >= 1);
        assert_eq!(stats.rounds == 1, stats.duplicates == 0);
    }

    // Tests progress observers see the final accepted count
    #[test]
    fn test_progress_reporting() {
        let mut snapshots: Vec<BuildProgress> = Vec::new();
        let corpus = CorpusBuilder::new(2)
            .build_with_progress(150, 6, 6, |progress| snapshots.push(progress))
            .expect("corpus builds");

        let last = snapshots.last().expect("at least one snapshot");
        assert_eq!(last.requested, 150);
        assert_eq!(last.accepted, corpus.len());
        assert_eq!(last.attempts, corpus.stats().attempts);
        assert!(snapshots.len() >= 2, "interval and round-end snapshots");
        assert!(
            snapshots
                .windows(2)
                .all(|pair| pair.first().map(|p| p.accepted) <= pair.last().map(|p| p.accepted))
        );
    }

    // Tests the dense array export matches each maze cell for cell
    #[test]
    fn test_to_array() {
        let corpus = build_corpus_seeded(3, 5, 4, 12).expect("corpus builds");
        let array = corpus.to_array();

        assert_eq!(array.dim(), (3, 4, 5));
        for (index, maze) in corpus.iter().enumerate() {
            for ((x, y), cell) in maze.indexed_cells() {
                assert_eq!(array.get([index, y, x]).copied(), Some(cell.as_u8()));
            }
        }
    }

    // Tests the known bounds on distinct mazes
    #[test]
    fn test_distinct_upper_bound() {
        assert_eq!(distinct_maze_upper_bound(1, 1), Some(1));
        assert_eq!(distinct_maze_upper_bound(1, 9), Some(1));
        assert_eq!(distinct_maze_upper_bound(9, 1), Some(1));
        assert_eq!(distinct_maze_upper_bound(2, 2), Some(4));
        assert_eq!(distinct_maze_upper_bound(8, 8), None);
    }
}
