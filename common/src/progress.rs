// Level curve is fixed at 100 XP per level: level N spans
// [(N-1)*100, N*100). Leveling itself happens on the backend when a
// collection is recorded; the client only derives display values.

pub const XP_PER_LEVEL: i32 = 100;

pub fn level_floor(level: i32) -> i32 {
    (level - 1) * XP_PER_LEVEL
}

pub fn level_ceiling(level: i32) -> i32 {
    level * XP_PER_LEVEL
}

pub fn progress_in_level(level: i32, experience: i32) -> i32 {
    experience - level_floor(level)
}

pub fn xp_to_next_level(level: i32, experience: i32) -> i32 {
    level_ceiling(level) - experience
}

// 0.0..=1.0, for progress bars
pub fn progress_ratio(level: i32, experience: i32) -> f64 {
    let progress = progress_in_level(level, experience) as f64 / XP_PER_LEVEL as f64;
    progress.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_bounds_follow_the_fixed_curve() {
        assert_eq!(level_floor(1), 0);
        assert_eq!(level_ceiling(1), 100);
        assert_eq!(level_floor(7), 600);
        assert_eq!(level_ceiling(7), 700);
    }

    #[test]
    fn progress_and_remaining_are_complementary() {
        for (level, experience) in [(1, 0), (1, 99), (3, 250), (12, 1100)] {
            let progress = progress_in_level(level, experience);
            let remaining = xp_to_next_level(level, experience);
            assert!(progress >= 0, "progress negative for {level}/{experience}");
            assert!(remaining >= 0, "remaining negative for {level}/{experience}");
            assert_eq!(progress + remaining, XP_PER_LEVEL);
        }
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(progress_ratio(2, 150), 0.5);
        assert_eq!(progress_ratio(1, 0), 0.0);
        // Out-of-band XP (backend hasn't leveled yet) never overflows the bar
        assert_eq!(progress_ratio(1, 250), 1.0);
    }
}
