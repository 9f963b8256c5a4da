use std::{sync::Arc, thread};

use skipdex::{DefaultComparator, Index, SkipList, SkipListOpenOptions, new_index};

fn main() -> skipdex::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let opts = SkipListOpenOptions::new().max_height(12).build()?;
    let mut list = SkipList::with_options(DefaultComparator::<u32>::default(), opts);
    for (k, v) in [(1, "one"), (3, "three"), (5, "five"), (7, "seven")] {
        list.put(k, v);
    }
    list.del(&5);

    println!("{:?}", list.get(&3));
    println!("{:?}", list.ceiling(&4));
    println!("{:?}", list.floor(&4));
    println!("{:?}", list.range(&2, &8));

    let index: Arc<Index<u32, u32, _>> = Arc::new(new_index(|a: &u32, b: &u32| a < b));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let index = index.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    index.put(i * 4 + t, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    println!("len = {}, height = {}", index.len(), index.height());
    println!("{:?}", index.get(&42));
    Ok(())
}
