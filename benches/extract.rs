// benches/extract.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use carex_scrape::core::extract::{extract_product_urls, extract_products};

fn synthetic_page(products: usize) -> String {
    let mut links = String::new();
    let mut items = Vec::with_capacity(products);
    for i in 0..products {
        links.push_str(&format!(
            "<link rel=\"prefetch\" href=\"https://carex.com/products/item-{i}\">\n"
        ));
        items.push(format!(
            r#"{{"id":{i},"title":"Item {i}","variants":[
                {{"id":{a},"name":"Item {i} - A","sku":"IT-{i}-A","price":1999,"public_title":"A"}},
                {{"id":{b},"name":"Item {i} - B","sku":"IT-{i}-B","price":2499,"public_title":"B"}}
            ]}}"#,
            a = i * 10 + 1,
            b = i * 10 + 2,
        ));
    }
    format!(
        "<html><head>{links}</head><body><div>{filler}</div><script>\n\
         var meta = {{\"products\":[{items}]}};\n\
         for (var attr in meta) {{ window[attr] = meta[attr]; }}\n\
         </script></body></html>",
        filler = "x".repeat(64 * 1024),
        items = items.join(",")
    )
}

fn bench_extract(c: &mut Criterion) {
    let page = synthetic_page(50);

    c.bench_function("extract_products_50", |b| {
        b.iter(|| extract_products(black_box(&page)))
    });
    c.bench_function("extract_product_urls_50", |b| {
        b.iter(|| extract_product_urls(black_box(&page)))
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
