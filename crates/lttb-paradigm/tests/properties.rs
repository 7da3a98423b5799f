//! Property tests over randomly generated dictionaries.
//!
//! Run: cargo test -p lttb-paradigm --test properties

mod common;

use std::sync::Arc;

use lttb_core::{Direction, MatchEntry};
use lttb_paradigm::{
    LemmaPattern, ParadigmOptions, ParadigmSession, PostProcessor, QueryPattern, TagPattern,
};
use proptest::prelude::*;

// -- Strategy helpers --

#[derive(Debug, Clone)]
struct Entry {
    lemma: String,
    tags: Vec<String>,
    surface: String,
}

impl Entry {
    fn analysis(&self) -> String {
        let mut s = self.lemma.clone();
        for t in &self.tags {
            s.push('<');
            s.push_str(t);
            s.push('>');
        }
        s
    }
}

const TAGS: &[&str] = &["sg", "pl", "def", "ind"];

fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        "[a-c]{1,3}",
        prop::sample::select(vec!["n", "vblex", "adj"]),
        prop::collection::vec(prop::sample::select(TAGS.to_vec()), 0..3),
        "[a-d]{0,4}",
    )
        .prop_map(|(lemma, category, rest, surface)| {
            let mut tags = vec![category.to_string()];
            tags.extend(rest.into_iter().map(str::to_string));
            Entry {
                lemma,
                tags,
                surface,
            }
        })
}

fn arb_dictionary() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(arb_entry(), 1..12)
}

fn sessions(dict: &[Entry], options: ParadigmOptions) -> (ParadigmSession, ParadigmSession) {
    let analyses: Vec<String> = dict.iter().map(Entry::analysis).collect();
    let pairs: Vec<(&str, &str)> = analyses
        .iter()
        .zip(dict)
        .map(|(a, e)| (a.as_str(), e.surface.as_str()))
        .collect();
    let generation = ParadigmSession::new(
        Arc::new(common::compile(&pairs, Direction::Generation)),
        options.clone().with_direction(Direction::Generation),
    );
    let analysis = ParadigmSession::new(
        Arc::new(common::compile(&pairs, Direction::Analysis)),
        options.with_direction(Direction::Analysis),
    );
    (generation, analysis)
}

fn concrete(entry: &Entry) -> QueryPattern {
    QueryPattern::new(
        LemmaPattern::literal(&entry.lemma),
        entry.tags.iter().map(|t| TagPattern::literal(t)).collect(),
    )
}

fn is_subset(small: &[String], large: &[String]) -> bool {
    small.iter().all(|line| large.contains(line))
}

// -- Properties --

proptest! {
    /// A generator and an analyser compiled from the same entries list the
    /// same pairs for every query.
    #[test]
    fn directions_are_symmetric(dict in arb_dictionary(), pick in any::<prop::sample::Index>()) {
        let (generation, analysis) = sessions(&dict, ParadigmOptions::new().with_sort(true));
        let entry = pick.get(&dict);
        for query in [entry.analysis(), format!("{}<*>", entry.lemma), "*<*>".to_string()] {
            prop_assert_eq!(generation.query(&query).unwrap(), analysis.query(&query).unwrap());
        }
    }

    /// Generating from a concrete analysis and reading the surface back
    /// recovers that analysis.
    #[test]
    fn generation_round_trips_through_analysis(
        dict in arb_dictionary(),
        pick in any::<prop::sample::Index>(),
    ) {
        let (generation, analysis) = sessions(&dict, ParadigmOptions::new());
        let entry = pick.get(&dict);
        let generated = generation.query_pattern(&concrete(entry));
        let expected_line = format!("{}:{}", entry.analysis(), entry.surface);
        prop_assert!(generated.contains(&expected_line));

        for line in &generated {
            let (a, _) = line.rsplit_once(':').unwrap();
            let analysed = analysis.query(a).unwrap();
            prop_assert!(analysed.contains(line), "{} missing from {:?}", line, analysed);
        }
    }

    /// Turning any concrete position into a wildcard never loses matches.
    #[test]
    fn wildcards_only_widen(
        dict in arb_dictionary(),
        pick in any::<prop::sample::Index>(),
        position in any::<prop::sample::Index>(),
    ) {
        let (generation, _) = sessions(&dict, ParadigmOptions::new().with_sort(true));
        let entry = pick.get(&dict);
        let base = concrete(entry);
        let narrow = generation.query_pattern(&base);

        let mut tag_wild = base.clone();
        let i = position.index(tag_wild.tags.len());
        tag_wild.tags[i] = TagPattern::Wildcard;
        prop_assert!(is_subset(&narrow, &generation.query_pattern(&tag_wild)));

        let mut lemma_wild = base.clone();
        lemma_wild.lemma = LemmaPattern::wildcard();
        prop_assert!(is_subset(&narrow, &generation.query_pattern(&lemma_wild)));
    }

    /// Each extra excluded tag removes lines and never adds any.
    #[test]
    fn exclusion_is_monotonic(
        dict in arb_dictionary(),
        excluded in prop::collection::vec(prop::sample::select(TAGS.to_vec()), 0..4),
    ) {
        let transducer = {
            let (g, _) = sessions(&dict, ParadigmOptions::new());
            Arc::clone(g.transducer())
        };
        let mut previous: Option<Vec<String>> = None;
        for k in 0..=excluded.len() {
            let mut options = ParadigmOptions::new().with_sort(true);
            for tag in &excluded[..k] {
                options = options.exclude(*tag);
            }
            let lines = ParadigmSession::new(Arc::clone(&transducer), options)
                .query("*<*>")
                .unwrap();
            for line in &lines {
                for tag in &excluded[..k] {
                    prop_assert!(
                        !line.contains(&format!("<{}>", tag)),
                        "excluded tag {} leaked",
                        tag
                    );
                }
            }
            if let Some(prev) = &previous {
                prop_assert!(is_subset(&lines, prev));
            }
            previous = Some(lines);
        }
    }

    /// Post-processing its own output changes nothing.
    #[test]
    fn post_processing_is_idempotent(dict in arb_dictionary(), sort in any::<bool>()) {
        let (generation, _) = sessions(&dict, ParadigmOptions::new());
        let raw = generation.matches(&"*<*>".parse().unwrap());
        let post = PostProcessor::new(["def"], sort);
        let once = post.process(raw.clone());
        prop_assert_eq!(post.process_lines(once.clone()), once.clone());

        // duplicated input collapses to the same lines
        let doubled: Vec<MatchEntry> = raw.iter().chain(raw.iter()).cloned().collect();
        prop_assert_eq!(post.process(doubled), once);
    }

    /// Sorted output is ordered and independent of emission order.
    #[test]
    fn sorted_output_ignores_emission_order(
        dict in arb_dictionary(),
        keys in prop::collection::vec(any::<u32>(), 0..64),
    ) {
        let (generation, _) = sessions(&dict, ParadigmOptions::new());
        let raw = generation.matches(&"*<*>".parse().unwrap());

        let mut keyed: Vec<(u32, MatchEntry)> = raw
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, e)| (keys.get(i).copied().unwrap_or(i as u32), e))
            .collect();
        keyed.sort_by_key(|(k, _)| *k);
        let shuffled: Vec<MatchEntry> = keyed.into_iter().map(|(_, e)| e).collect();

        let post = PostProcessor::new(Vec::<String>::new(), true);
        let sorted = post.process(raw);
        prop_assert!(sorted.windows(2).all(|w| w[0].as_bytes() < w[1].as_bytes()));
        prop_assert_eq!(post.process(shuffled), sorted);
    }
}
