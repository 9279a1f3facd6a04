use crate::models::{Entity, Grant, Outcome, Placement};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Greedy topic allocator driven by a random priority order.
pub struct TopicAllocator<'a> {
    /// Entities with at least one stated choice, in input order
    candidates: Vec<&'a Entity>,
    width: usize,
}

impl<'a> TopicAllocator<'a> {
    pub fn new(entities: &'a [Entity], width: usize) -> Self {
        // Rows without any choice take no part in the allocation at all
        let candidates: Vec<&Entity> = entities.iter().filter(|e| e.has_choices()).collect();

        let dropped = entities.len() - candidates.len();
        if dropped > 0 {
            debug!(dropped, "ignoring entities without any stated choice");
        }

        Self { candidates, width }
    }

    /// Number of entities that take part in every attempt.
    pub fn considered(&self) -> usize {
        self.candidates.len()
    }

    /// Run one attempt with a freshly shuffled priority order.
    pub fn allocate<R: Rng + ?Sized>(&self, rng: &mut R) -> Outcome {
        let mut order: Vec<usize> = (0..self.candidates.len()).collect();
        order.shuffle(rng);
        self.allocate_in_order(&order)
    }

    /// Run one attempt with an explicit priority order.
    ///
    /// `order` holds indices into the considered entities; earlier entries win
    /// contested topics. Every index must appear exactly once.
    pub fn allocate_in_order(&self, order: &[usize]) -> Outcome {
        debug_assert_eq!(order.len(), self.candidates.len());

        let mut outcome = Outcome::empty(self.width);
        let mut topics_used: HashSet<&str> = HashSet::new();

        for &index in order {
            let entity = self.candidates[index];

            // First stated choice that nobody ahead of this entity has taken
            let mut grant = None;
            for (position, choice) in entity.stated_choices().enumerate() {
                if topics_used.contains(choice) {
                    continue;
                }
                topics_used.insert(choice);
                if position >= outcome.rank_vector.len() {
                    outcome.rank_vector.resize(position + 1, 0);
                }
                outcome.rank_vector[position] += 1;
                grant = Some(Grant {
                    resource: choice.to_string(),
                    rank: position + 1,
                });
                break;
            }

            if grant.is_none() {
                outcome.unassigned += 1;
            }

            outcome.placements.push(Placement {
                name: entity.name.clone(),
                grant,
            });
        }

        outcome
    }
}
