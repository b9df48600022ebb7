//! Function composition helpers.

/// Compose two functions right to left: `compose(f, g)(x)` is `f(g(x))`.
pub fn compose<A, B, C>(f: impl Fn(B) -> C, g: impl Fn(A) -> B) -> impl Fn(A) -> C {
    move |x| f(g(x))
}

/// Compose two functions left to right: `pipe(f, g)(x)` is `g(f(x))`.
pub fn pipe<A, B, C>(f: impl Fn(A) -> B, g: impl Fn(B) -> C) -> impl Fn(A) -> C {
    move |x| g(f(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_applies_right_to_left() {
        let double_after_increment = compose(|x: i32| x * 2, |x: i32| x + 1);
        assert_eq!(double_after_increment(3), 8);
    }

    #[test]
    fn test_pipe_applies_left_to_right() {
        let double_first = pipe(|x: i32| x * 2, |x: i32| x + 1);
        assert_eq!(double_first(3), 7);
    }

    #[test]
    fn test_composition_can_change_types() {
        let digits = pipe(|n: u32| n.to_string(), |s: String| s.len());
        assert_eq!(digits(12345), 5);
    }
}
