#[allow(unused)]
use crate::prelude::*;

/// Array of the given shape filled from `Uniform(-3, 3)` using `rng`.
#[macro_export]
macro_rules! rand_array {
    ($rng:expr, $shape:expr) => {{
        use $crate::prelude::RandomExt;
        $crate::prelude::Array::random_using($shape, $crate::prelude::Uniform::new(-3., 3.), $rng)
    }};
}
