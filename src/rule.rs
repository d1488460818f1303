use crate::Error;

/// One move of the Collatz iteration.
///
/// `apply` is only called with `n > 1` and returns the next value together with
/// the number of steps the move accounts for, or `None` if the next value
/// doesn't fit in `u64`.
pub trait StepRule {
    const NAME: &'static str;

    fn apply(&self, n: u64) -> Option<(u64, u64)>;
}

/// Textbook rule, one step per move.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl StepRule for Naive {
    const NAME: &'static str = "naive";

    fn apply(&self, n: u64) -> Option<(u64, u64)> {
        if n & 1 == 1 {
            n.checked_mul(3)?.checked_add(1).map(|next| (next, 1))
        } else {
            Some((n >> 1, 1))
        }
    }
}

/// Folds the halving that always follows an odd move into the odd move.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimized;

impl StepRule for Optimized {
    const NAME: &'static str = "optimized";

    fn apply(&self, n: u64) -> Option<(u64, u64)> {
        if n & 1 == 1 {
            // n odd => 3n odd => 3n + 1 even.
            n.checked_mul(3)?.checked_add(1).map(|next| (next >> 1, 2))
        } else {
            Some((n >> 1, 1))
        }
    }
}

/// Count the steps the Collatz sequence starting from `start` takes to reach 1.
///
/// Termination isn't checked, it's assumed from the conjecture.
pub fn sequence_length<R: StepRule>(start: u64, rule: &R) -> Result<u64, Error> {
    if start == 0 {
        return Err(Error::ZeroStart);
    }

    let mut result = start;
    let mut steps = 0;
    while result != 1 {
        let (next, step_n) = rule
            .apply(result)
            .ok_or(Error::Overflow { start, value: result })?;
        result = next;
        steps += step_n;
    }

    Ok(steps)
}
