use ringspsc_rs::{channel, Config};
use std::thread;
use std::time::Instant;

const TOTAL_MESSAGES: u64 = 100_000_000; // 100M messages per run
const BATCH_SIZE: usize = 4096; // consumer batch cap

fn run_benchmark(ring_bits: u8) {
    let (mut producer, mut consumer) = channel::<u64>(Config::new(ring_bits, true));
    let capacity = producer.capacity();

    let start = Instant::now();

    let producer_handle = thread::spawn(move || {
        for i in 0..TOTAL_MESSAGES {
            let mut value = i;
            while let Err(full) = producer.try_push(value) {
                value = full.into_inner();
                std::hint::spin_loop();
            }
        }
        producer
    });

    let consumer_handle = thread::spawn(move || {
        let mut received = 0u64;
        let mut checksum = 0u64;

        while received < TOTAL_MESSAGES {
            let consumed = consumer.consume_up_to(BATCH_SIZE, |item| {
                checksum = checksum.wrapping_add(item);
            }) as u64;

            received += consumed;

            if consumed == 0 {
                std::hint::spin_loop();
            }
        }

        (received, checksum)
    });

    let producer = producer_handle.join().unwrap();
    let (received, checksum) = consumer_handle.join().unwrap();

    let duration = start.elapsed();
    assert_eq!(received, TOTAL_MESSAGES);
    assert_eq!(checksum, TOTAL_MESSAGES * (TOTAL_MESSAGES - 1) / 2);

    let metrics = producer.metrics();
    let throughput = TOTAL_MESSAGES as f64 / duration.as_secs_f64();
    let ns_per_msg = duration.as_nanos() as f64 / TOTAL_MESSAGES as f64;

    println!(
        "| {:>8} | {:10.1} | {:9.2} | {:12} | {:10.1} |",
        capacity,
        throughput / 1_000_000.0,
        ns_per_msg,
        metrics.full_rejections,
        metrics.messages_received as f64 / metrics.batches_received.max(1) as f64,
    );
}

fn main() {
    println!("\nRingSPSC Benchmark (1 producer, 1 consumer)");
    println!("===========================================");
    println!("Total messages: {} ({:.1}M)", TOTAL_MESSAGES, TOTAL_MESSAGES as f64 / 1_000_000.0);
    println!("Consumer batch cap: {}\n", BATCH_SIZE);

    println!("| Capacity | Throughput | ns/msg    | Full rejects | Avg batch  |");
    println!("|          | (M msg/s)  |           |              |            |");
    println!("|----------|------------|-----------|--------------|------------|");

    for ring_bits in [6, 10, 12, 16] {
        run_benchmark(ring_bits);
    }

    println!("\nBenchmark complete!");
}
