//! Lazy number sequences and slice helpers: bounded and unbounded
//! iterators plus positional list transforms.

/// First `n` elements (fewer when the slice is shorter).
pub fn first_n<T: Clone>(seq: &[T], n: usize) -> Vec<T> {
    seq.iter().take(n).cloned().collect()
}

/// Last `n` elements, preserving order.
pub fn last_n<T: Clone>(seq: &[T], n: usize) -> Vec<T> {
    let start = seq.len().saturating_sub(n);
    seq[start..].to_vec()
}

pub fn reversed<T: Clone>(seq: &[T]) -> Vec<T> {
    seq.iter().rev().cloned().collect()
}

/// Elements at even positions: indices 0, 2, 4, ...
pub fn every_other<T: Clone>(seq: &[T]) -> Vec<T> {
    seq.iter().step_by(2).cloned().collect()
}

/// All contiguous windows of length `k`. Empty when k is zero or larger
/// than the slice.
pub fn windows_of<T: Clone>(seq: &[T], k: usize) -> Vec<Vec<T>> {
    if k == 0 || k > seq.len() {
        return Vec::new();
    }
    seq.windows(k).map(<[T]>::to_vec).collect()
}

/// 0, 1, ..., n-1.
pub fn naturals(n: u64) -> impl Iterator<Item = u64> {
    0..n
}

/// The first `n` squares: 0, 1, 4, 9, ...
pub fn squares(n: u64) -> impl Iterator<Item = u64> {
    (0..n).map(|i| i * i)
}

/// Unbounded even numbers: 0, 2, 4, ...
pub fn evens() -> impl Iterator<Item = u64> {
    (0..).map(|i| 2 * i)
}

/// Unbounded Fibonacci sequence: 0, 1, 1, 2, 3, ... Stops cleanly at the
/// first term that would overflow u64.
pub fn fibonacci() -> Fibonacci {
    Fibonacci { a: 0, b: 1 }
}

pub struct Fibonacci {
    a: u64,
    b: u64,
}

impl Iterator for Fibonacci {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.a;
        let next = self.a.checked_add(self.b)?;
        self.a = self.b;
        self.b = next;
        Some(current)
    }
}

/// Unbounded primes: 2, 3, 5, 7, 11, ...
pub fn primes() -> Primes {
    Primes { candidate: 2 }
}

pub struct Primes {
    candidate: u64,
}

fn is_prime(x: u64) -> bool {
    if x < 2 {
        return false;
    }
    if x == 2 {
        return true;
    }
    if x % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d * d <= x {
        if x % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

impl Iterator for Primes {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            let candidate = self.candidate;
            self.candidate = self.candidate.checked_add(1)?;
            if is_prime(candidate) {
                return Some(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_n() {
        assert_eq!(first_n(&[1, 2, 3, 4], 3), vec![1, 2, 3]);
        assert_eq!(first_n(&[9], 3), vec![9]);
    }

    #[test]
    fn test_last_n() {
        assert_eq!(last_n(&[5, 6, 7, 8], 2), vec![7, 8]);
        assert_eq!(last_n(&[1], 2), vec![1]);
    }

    #[test]
    fn test_reversed() {
        assert_eq!(reversed(&[1, 2, 3]), vec![3, 2, 1]);
        assert_eq!(reversed::<i32>(&[]), Vec::<i32>::new());
    }

    #[test]
    fn test_every_other() {
        assert_eq!(every_other(&[10, 11, 12, 13, 14]), vec![10, 12, 14]);
        assert_eq!(every_other(&[1, 2, 3, 4, 5, 6]), vec![1, 3, 5]);
    }

    #[test]
    fn test_windows_of() {
        assert_eq!(
            windows_of(&[1, 2, 3, 4], 2),
            vec![vec![1, 2], vec![2, 3], vec![3, 4]]
        );
        assert_eq!(windows_of(&[1, 2, 3], 3), vec![vec![1, 2, 3]]);
        assert!(windows_of(&[1, 2, 3], 0).is_empty());
        assert!(windows_of(&[1, 2, 3], 4).is_empty());
    }

    #[test]
    fn test_naturals() {
        assert_eq!(naturals(3).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_squares() {
        assert_eq!(squares(4).collect::<Vec<_>>(), vec![0, 1, 4, 9]);
    }

    #[test]
    fn test_evens_is_unbounded() {
        assert_eq!(evens().take(5).collect::<Vec<_>>(), vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_fibonacci() {
        assert_eq!(fibonacci().take(5).collect::<Vec<_>>(), vec![0, 1, 1, 2, 3]);
    }

    #[test]
    fn test_primes() {
        assert_eq!(primes().take(5).collect::<Vec<_>>(), vec![2, 3, 5, 7, 11]);
    }
}
