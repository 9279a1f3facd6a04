use crate::allocator::TopicAllocator;
use crate::models::Outcome;
use rand::Rng;
use tracing::{debug, info};

/// Observer notified before every allocation attempt.
pub trait ProgressObserver {
    fn on_attempt(&mut self, attempt: usize, total: usize);
}

/// Silent observer.
impl ProgressObserver for () {
    fn on_attempt(&mut self, _attempt: usize, _total: usize) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// The first attempt whose unassigned count met the threshold
    Accepted { outcome: Outcome, attempt: usize },
    /// No attempt met the threshold within the budget
    Exhausted { attempts: usize },
}

pub struct AssignmentSearch<'a> {
    allocator: &'a TopicAllocator<'a>,
    max_iterations: usize,
    unassigned_threshold: usize,
}

impl<'a> AssignmentSearch<'a> {
    pub fn new(allocator: &'a TopicAllocator<'a>) -> Self {
        Self {
            allocator,
            max_iterations: 1,
            unassigned_threshold: 0,
        }
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn unassigned_threshold(mut self, unassigned_threshold: usize) -> Self {
        self.unassigned_threshold = unassigned_threshold;
        self
    }

    /// Allocate repeatedly until an attempt leaves at most
    /// `unassigned_threshold` entities without a topic.
    ///
    /// The first acceptable attempt wins; later attempts are never run, so no
    /// comparison between acceptable outcomes takes place.
    pub fn run<R, P>(&self, rng: &mut R, progress: &mut P) -> SearchResult
    where
        R: Rng + ?Sized,
        P: ProgressObserver + ?Sized,
    {
        for attempt in 1..=self.max_iterations {
            progress.on_attempt(attempt, self.max_iterations);

            let outcome = self.allocator.allocate(rng);
            debug!(attempt, unassigned = outcome.unassigned, "allocation attempt finished");

            if outcome.unassigned <= self.unassigned_threshold {
                info!(attempt, unassigned = outcome.unassigned, "criteria met");
                return SearchResult::Accepted { outcome, attempt };
            }
        }

        info!(attempts = self.max_iterations, "no attempt met the unassigned threshold");
        SearchResult::Exhausted {
            attempts: self.max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct CountingObserver {
        calls: Vec<(usize, usize)>,
    }

    impl ProgressObserver for CountingObserver {
        fn on_attempt(&mut self, attempt: usize, total: usize) {
            self.calls.push((attempt, total));
        }
    }

    fn entity(name: &str, choices: &[&str]) -> Entity {
        Entity::new(name, choices.iter().map(|c| Some(c.to_string())).collect())
    }

    #[test]
    fn unreachable_threshold_exhausts_the_whole_budget() {
        // Three entities share two topics, so someone is always left out
        let entities = vec![entity("A", &["X", "Y"]), entity("B", &["X"]), entity("C", &["Y"])];
        let allocator = TopicAllocator::new(&entities, 2);
        let mut observer = CountingObserver::default();

        let result = AssignmentSearch::new(&allocator)
            .max_iterations(25)
            .run(&mut StdRng::seed_from_u64(5), &mut observer);

        assert_eq!(result, SearchResult::Exhausted { attempts: 25 });
        assert_eq!(observer.calls.len(), 25);
        assert_eq!(observer.calls.first(), Some(&(1, 25)));
        assert_eq!(observer.calls.last(), Some(&(25, 25)));
    }

    #[test]
    fn threshold_covering_everyone_accepts_first_attempt() {
        let entities = vec![entity("A", &["X"]), entity("B", &["X"]), entity("C", &["X"])];
        let allocator = TopicAllocator::new(&entities, 1);
        let mut observer = CountingObserver::default();

        let result = AssignmentSearch::new(&allocator)
            .max_iterations(10)
            .unassigned_threshold(allocator.considered())
            .run(&mut StdRng::seed_from_u64(8), &mut observer);

        match result {
            SearchResult::Accepted { outcome, attempt } => {
                assert_eq!(attempt, 1);
                assert_eq!(outcome.unassigned, 2);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
        assert_eq!(observer.calls, vec![(1, 10)]);
    }

    #[test]
    fn single_iteration_makes_exactly_one_attempt() {
        let entities = vec![entity("A", &["X"]), entity("B", &["X"])];
        let allocator = TopicAllocator::new(&entities, 1);
        let mut observer = CountingObserver::default();

        let result = AssignmentSearch::new(&allocator).run(&mut StdRng::seed_from_u64(2), &mut observer);

        assert_eq!(result, SearchResult::Exhausted { attempts: 1 });
        assert_eq!(observer.calls.len(), 1);
    }

    #[test]
    fn retries_until_an_attempt_qualifies() {
        // Only the order B before A leaves nobody out
        let entities = vec![entity("A", &["X", "Y"]), entity("B", &["X"])];
        let allocator = TopicAllocator::new(&entities, 2);
        let mut rng = StdRng::seed_from_u64(21);

        let result = AssignmentSearch::new(&allocator)
            .max_iterations(200)
            .run(&mut rng, &mut ());

        match result {
            SearchResult::Accepted { outcome, attempt } => {
                assert!(attempt >= 1 && attempt <= 200);
                assert_eq!(outcome.unassigned, 0);
                assert_eq!(outcome.rank_vector, vec![1, 1]);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let entities: Vec<Entity> = ["A", "B", "C", "D"]
            .iter()
            .map(|name| entity(name, &["X", "Y", "Z"]))
            .collect();
        let allocator = TopicAllocator::new(&entities, 3);
        let search = AssignmentSearch::new(&allocator).max_iterations(5).unassigned_threshold(1);

        let first = search.run(&mut StdRng::seed_from_u64(42), &mut ());
        let second = search.run(&mut StdRng::seed_from_u64(42), &mut ());
        assert!(matches!(first, SearchResult::Accepted { attempt: 1, .. }));
        assert_eq!(first, second);
    }
}
