/// Lexicographic iterator over every way of choosing 5 indices out of `n`.
///
/// Showdown hands have 5 to 7 cards available (two hole cards plus a flop,
/// turn or river board), so `n` yields 1, 6 or 21 combinations respectively.
#[derive(Debug, Clone)]
pub struct FiveOf {
    n: usize,
    indices: [usize; 5],
    done: bool,
}

impl FiveOf {
    pub fn new(n: usize) -> Self {
        Self { n, indices: [0, 1, 2, 3, 4], done: n < 5 }
    }
}

impl Iterator for FiveOf {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let out = self.indices;

        // bump the rightmost index that still has room, then pack the tail behind it
        let mut i = 5;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - (5 - i) {
                self.indices[i] += 1;
                for j in (i + 1)..5 {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }
        Some(out)
    }
}
