use flappy_tui::avatar::Avatar;
use flappy_tui::config::Tuning;
use flappy_tui::stream::ObstacleStream;

use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn retirements_are_replaced_one_for_one() {
    let tuning = Tuning::default();
    let mut avatar = Avatar::new(&tuning);
    // Out of reach of every span so nothing collides.
    avatar.y = -10_000.0;

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stream = ObstacleStream::new();
        stream.spawn_initial(3, &tuning, &mut rng);

        let mut total_points = 0;
        for _ in 0..2000 {
            let before = stream.len();
            let out = stream.advance(&avatar, &tuning, &mut rng);
            assert!(out.spawned <= 1);
            assert_eq!(out.spawned, usize::from(out.retired > 0));
            assert_eq!(stream.len(), before - out.retired + out.spawned);
            assert!(!out.collided);
            total_points += out.points;

            for pair in stream.obstacles().windows(2) {
                assert!(pair[0].x < pair[1].x, "stream out of order");
            }
            for o in stream.obstacles() {
                assert!(o.gap_y >= 150.0);
                assert!(o.gap_y + o.gap_size <= tuning.floor_y() - 150.0);
            }
        }
        // 2000 ticks at 3 units/tick cover 6000 units of pipes.
        assert!(total_points >= 20, "seed {seed}: only {total_points} points");
    }
}

#[test]
fn stream_never_runs_dry() {
    let tuning = Tuning::default();
    let mut avatar = Avatar::new(&tuning);
    avatar.y = -10_000.0;
    let mut rng = StdRng::seed_from_u64(77);
    let mut stream = ObstacleStream::new();
    stream.spawn_initial(3, &tuning, &mut rng);
    for _ in 0..5000 {
        stream.advance(&avatar, &tuning, &mut rng);
        assert!(!stream.is_empty());
        assert!(stream.obstacles().iter().any(|o| o.x > tuning.avatar_x));
    }
}
