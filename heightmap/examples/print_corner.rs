use heightmap::{DiamondSquare, SeededSource};

fn main() {
    // Generate a 129×129 heightmap with seed 2025, roughness 0.8
    let ds = DiamondSquare::new(129, 0.8).expect("129 is 2^7 + 1");
    let map = ds.generate(&mut SeededSource::new(2025));

    // Print the top-left 16×16 corner of the map
    for y in 0..16 {
        for x in 0..16 {
            print!("{:>6.3} ", map.get(x, y));
        }
        println!();
    }
}
