//! Question generation
//!
//! Each question is one arithmetic problem plus two distractors that look like
//! real mistakes: digit-alignment slips, carry/borrow slips, off-by-one-factor
//! slips and adjacent quotients. All randomness comes from the caller's RNG so
//! generation is reproducible with a seeded `Pcg32`.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::state::Mode;
use crate::consts::{FALLBACK_ATTEMPTS, OPTION_COUNT};

/// Operand range for addition and subtraction
const ADD_SUB_RANGE: std::ops::RangeInclusive<i32> = 1..=99;
/// Operand range for multiplication
const MUL_RANGE: std::ops::RangeInclusive<i32> = 2..=13;
/// Divisor and quotient range for division
const DIV_RANGE: std::ops::RangeInclusive<i32> = 2..=12;
/// Random fallback offsets
const FALLBACK_OFFSET: std::ops::RangeInclusive<i32> = -10..=10;

/// Operands of a single problem.
///
/// For division `a` is the dividend and `b` the divisor, and `a` is always an
/// exact multiple of `b`. For subtraction `a > b`. The constructors reject
/// operands outside the generated ranges, so `answer` cannot overflow or
/// divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub mode: Mode,
    pub a: i32,
    pub b: i32,
}

impl Problem {
    fn new(mode: Mode, a: i32, b: i32) -> Self {
        Self { mode, a, b }
    }

    fn ordered_subtraction(a: i32, b: i32) -> Self {
        let (a, b) = if a < b { (b, a) } else { (a, b) };
        Self::new(Mode::Subtraction, a, b)
    }

    pub fn addition(a: i32, b: i32) -> Option<Self> {
        (ADD_SUB_RANGE.contains(&a) && ADD_SUB_RANGE.contains(&b))
            .then(|| Self::new(Mode::Addition, a, b))
    }

    /// Operands are swapped so the result is positive; equal operands are rejected
    pub fn subtraction(a: i32, b: i32) -> Option<Self> {
        (ADD_SUB_RANGE.contains(&a) && ADD_SUB_RANGE.contains(&b) && a != b)
            .then(|| Self::ordered_subtraction(a, b))
    }

    pub fn multiplication(a: i32, b: i32) -> Option<Self> {
        (MUL_RANGE.contains(&a) && MUL_RANGE.contains(&b))
            .then(|| Self::new(Mode::Multiplication, a, b))
    }

    /// Build the dividend from the quotient so division is always exact
    pub fn division(divisor: i32, quotient: i32) -> Option<Self> {
        (DIV_RANGE.contains(&divisor) && DIV_RANGE.contains(&quotient))
            .then(|| Self::new(Mode::Division, quotient * divisor, divisor))
    }

    /// Draw operands for `mode`
    pub fn random<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> Self {
        match mode {
            Mode::Addition => Self::new(
                mode,
                rng.random_range(ADD_SUB_RANGE),
                rng.random_range(ADD_SUB_RANGE),
            ),
            Mode::Subtraction => {
                // Draw b from the 98 values other than a so the answer is >= 1
                let a = rng.random_range(ADD_SUB_RANGE);
                let mut b = rng.random_range(*ADD_SUB_RANGE.start()..*ADD_SUB_RANGE.end());
                if b >= a {
                    b += 1;
                }
                Self::ordered_subtraction(a, b)
            }
            Mode::Multiplication => Self::new(
                mode,
                rng.random_range(MUL_RANGE),
                rng.random_range(MUL_RANGE),
            ),
            Mode::Division => {
                let divisor = rng.random_range(DIV_RANGE);
                let quotient = rng.random_range(DIV_RANGE);
                Self::new(mode, quotient * divisor, divisor)
            }
        }
    }

    pub fn answer(&self) -> i32 {
        match self.mode {
            Mode::Addition => self.a + self.b,
            Mode::Subtraction => self.a - self.b,
            Mode::Multiplication => self.a * self.b,
            Mode::Division => self.a / self.b,
        }
    }

    pub fn text(&self) -> String {
        format!("{} {} {}", self.a, self.mode.symbol(), self.b)
    }

    /// Near-miss offset passes, one accepted candidate per pass
    fn distractor_passes<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec<i32>> {
        let (a, b) = (self.a, self.b);
        match self.mode {
            Mode::Addition | Mode::Subtraction => vec![
                // Digit alignment
                vec![10, -10, 20, -20],
                // Carry/borrow
                vec![1, -1, 9, -9, 11, -11],
            ],
            Mode::Multiplication => {
                let factor = if rng.random_bool(0.5) { a } else { b };
                vec![
                    // Neighbouring multiples
                    vec![factor, -factor, factor * 2, -factor * 2],
                    // Off by one factor
                    vec![a, -a, b, -b, 1, -1],
                ]
            }
            // Adjacent quotients
            Mode::Division => vec![vec![1, -1, 2, -2, b, -b]],
        }
    }
}

/// Growing set of options seeded with the correct answer
struct OptionSet {
    answer: i32,
    values: Vec<i32>,
}

impl OptionSet {
    fn new(answer: i32) -> Self {
        let mut values = Vec::with_capacity(OPTION_COUNT);
        values.push(answer);
        Self { answer, values }
    }

    fn is_full(&self) -> bool {
        self.values.len() >= OPTION_COUNT
    }

    fn try_add(&mut self, value: i32) -> bool {
        if self.is_full() || value <= 0 || value == self.answer || self.values.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }
}

/// One generated question. Immutable; replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    problem: Problem,
    problem_text: String,
    correct_answer: i32,
    options: [i32; OPTION_COUNT],
}

impl Question {
    /// Build a question for fixed operands, drawing distractors from `rng`
    pub fn from_problem<R: Rng + ?Sized>(problem: Problem, rng: &mut R) -> Self {
        Self::from_problem_with_cap(problem, rng, FALLBACK_ATTEMPTS)
    }

    pub fn from_problem_with_cap<R: Rng + ?Sized>(
        problem: Problem,
        rng: &mut R,
        fallback_attempts: u32,
    ) -> Self {
        let answer = problem.answer();
        let mut set = OptionSet::new(answer);

        for mut pass in problem.distractor_passes(rng) {
            pass.shuffle(rng);
            for offset in pass {
                if set.try_add(answer + offset) {
                    break;
                }
            }
        }

        let mut attempts = 0;
        while !set.is_full() && attempts < fallback_attempts {
            attempts += 1;
            let offset = match rng.random_range(FALLBACK_OFFSET) {
                0 => 5,
                n => n,
            };
            set.try_add(answer + offset);
        }

        if !set.is_full() {
            log::error!(
                "Distractor fallback exhausted after {} attempts for '{}', filling sequentially",
                attempts,
                problem.text()
            );
            let mut step = 1;
            while !set.is_full() {
                set.try_add(answer + step);
                step += 1;
            }
        }

        let mut values = set.values;
        values.shuffle(rng);

        Self {
            problem,
            problem_text: problem.text(),
            correct_answer: answer,
            options: [values[0], values[1], values[2]],
        }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn problem_text(&self) -> &str {
        &self.problem_text
    }

    pub fn correct_answer(&self) -> i32 {
        self.correct_answer
    }

    pub fn options(&self) -> &[i32; OPTION_COUNT] {
        &self.options
    }

    /// Option at a display slot (0-based)
    pub fn option(&self, index: usize) -> Option<i32> {
        self.options.get(index).copied()
    }

    pub fn is_correct(&self, choice: i32) -> bool {
        choice == self.correct_answer
    }
}

/// Generate a fresh question for `mode`
pub fn generate_question<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> Question {
    generate_question_with_cap(mode, rng, FALLBACK_ATTEMPTS)
}

pub fn generate_question_with_cap<R: Rng + ?Sized>(
    mode: Mode,
    rng: &mut R,
    fallback_attempts: u32,
) -> Question {
    let problem = Problem::random(mode, rng);
    Question::from_problem_with_cap(problem, rng, fallback_attempts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_contract(q: &Question) {
        let opts = q.options();
        assert_eq!(opts.len(), 3);
        assert!(opts.iter().all(|&o| o > 0), "non-positive option in {:?}", q);
        assert_eq!(opts.iter().filter(|&&o| o == q.correct_answer()).count(), 1);
        assert!(opts[0] != opts[1] && opts[1] != opts[2] && opts[0] != opts[2]);
    }

    #[test]
    fn test_addition_text_and_answer() {
        let p = Problem::addition(45, 30).unwrap();
        assert_eq!(p.answer(), 75);
        assert_eq!(p.text(), "45 + 30");
    }

    #[test]
    fn test_division_builds_exact_dividend() {
        let p = Problem::division(6, 7).unwrap();
        assert_eq!(p.a, 42);
        assert_eq!(p.answer(), 7);
        assert_eq!(p.text(), "42 ÷ 6");
    }

    #[test]
    fn test_subtraction_swaps_operands() {
        let p = Problem::subtraction(12, 40).unwrap();
        assert_eq!((p.a, p.b), (40, 12));
        assert_eq!(p.answer(), 28);
        assert_eq!(p.text(), "40 - 12");
    }

    #[test]
    fn test_multiplication_text_uses_times_sign() {
        assert_eq!(Problem::multiplication(7, 8).unwrap().text(), "7 × 8");
    }

    #[test]
    fn test_contract_holds_for_every_mode() {
        let mut rng = Pcg32::seed_from_u64(42);
        for mode in Mode::ALL {
            for _ in 0..500 {
                let q = generate_question(mode, &mut rng);
                assert_contract(&q);
            }
        }
    }

    #[test]
    fn test_small_answer_still_gets_positive_distractors() {
        // 1 leaves almost no room below zero
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let q = Question::from_problem(Problem::subtraction(2, 1).unwrap(), &mut rng);
            assert_contract(&q);
        }
    }

    #[test]
    fn test_near_miss_distractors_for_addition() {
        // Pass A always succeeds for answer 75, pass B always succeeds too
        let mut rng = Pcg32::seed_from_u64(9);
        let q = Question::from_problem(Problem::addition(45, 30).unwrap(), &mut rng);
        let wrong: Vec<i32> = q.options().iter().copied().filter(|&o| o != 75).collect();
        assert!(wrong.iter().any(|o| [65, 85, 55, 95].contains(o)));
        assert!(wrong.iter().any(|o| [74, 76, 66, 84, 64, 86].contains(o)));
    }

    #[test]
    fn test_near_miss_distractors_for_subtraction() {
        let mut rng = Pcg32::seed_from_u64(13);
        for _ in 0..200 {
            let q = Question::from_problem(Problem::subtraction(40, 12).unwrap(), &mut rng);
            let wrong: Vec<i32> = q.options().iter().copied().filter(|&o| o != 28).collect();
            // Digit alignment and borrow offsets are disjoint for 28
            assert_eq!(wrong.iter().filter(|o| [38, 18, 48, 8].contains(o)).count(), 1);
            assert_eq!(
                wrong.iter().filter(|o| [27, 29, 19, 37, 17, 39].contains(o)).count(),
                1
            );
        }
    }

    #[test]
    fn test_near_miss_distractors_for_multiplication() {
        // Neighbouring multiples of 7 or 8, then off by one factor
        let multiples = [63, 49, 70, 42, 64, 48, 72, 40];
        let off_by_factor = [63, 49, 64, 48, 57, 55];
        let mut rng = Pcg32::seed_from_u64(17);
        for _ in 0..200 {
            let q = Question::from_problem(Problem::multiplication(7, 8).unwrap(), &mut rng);
            let wrong: Vec<i32> = q.options().iter().copied().filter(|&o| o != 56).collect();
            assert_eq!(wrong.len(), 2);
            let (x, y) = (wrong[0], wrong[1]);
            assert!(
                (multiples.contains(&x) && off_by_factor.contains(&y))
                    || (multiples.contains(&y) && off_by_factor.contains(&x)),
                "distractors {:?} for 7 × 8",
                wrong
            );
        }
    }

    #[test]
    fn test_constructors_reject_out_of_range_operands() {
        assert_eq!(Problem::division(0, 7), None);
        assert_eq!(Problem::division(7, 0), None);
        assert_eq!(Problem::division(13, 12), None);
        assert_eq!(Problem::addition(0, 5), None);
        assert_eq!(Problem::addition(i32::MAX, 1), None);
        assert_eq!(Problem::subtraction(5, 5), None);
        assert_eq!(Problem::subtraction(-3, 5), None);
        assert_eq!(Problem::multiplication(1, 5), None);
        assert_eq!(Problem::multiplication(i32::MAX, 2), None);
        assert!(Problem::division(12, 12).is_some());
    }

    #[test]
    fn test_division_distractors_stay_near_quotient() {
        let mut rng = Pcg32::seed_from_u64(11);
        let q = Question::from_problem(Problem::division(6, 7).unwrap(), &mut rng);
        let wrong: Vec<i32> = q.options().iter().copied().filter(|&o| o != 7).collect();
        // First is an adjacent quotient, second comes from the fallback
        assert!(wrong.iter().any(|o| [6, 8, 5, 9, 1, 13].contains(o)));
        assert!(wrong.iter().all(|&o| (o - 7).abs() <= 10));
    }

    #[test]
    fn test_exhausted_fallback_fills_sequentially() {
        let mut rng = Pcg32::seed_from_u64(5);
        let q = Question::from_problem_with_cap(Problem::division(2, 2).unwrap(), &mut rng, 0);
        assert_contract(&q);
    }

    #[test]
    fn test_same_seed_same_question() {
        let mut a = Pcg32::seed_from_u64(1234);
        let mut b = Pcg32::seed_from_u64(1234);
        for mode in Mode::ALL {
            assert_eq!(generate_question(mode, &mut a), generate_question(mode, &mut b));
        }
    }

    #[test]
    fn test_option_order_varies() {
        let mut rng = Pcg32::seed_from_u64(77);
        let mut slots = [0u32; 3];
        for _ in 0..300 {
            let q = Question::from_problem(Problem::addition(45, 30).unwrap(), &mut rng);
            let idx = q.options().iter().position(|&o| o == 75).unwrap();
            slots[idx] += 1;
        }
        assert!(slots.iter().all(|&n| n > 50), "answer slot counts {:?}", slots);
    }
}
