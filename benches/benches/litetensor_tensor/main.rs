mod memory;

use criterion::criterion_main;

criterion_main!(memory::benches);
