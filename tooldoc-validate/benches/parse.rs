#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in benchmarks"
)]
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tooldoc_validate::parser;

const PAGE_SMALL: &str = "---
title: Storage operations
description: Reference pages for the storage commands of the tool catalog.
topic: tool-catalog
date: 2026-08-28
service: storage
---

# Storage operations

## Available operations

### storage.accounts-list

Lists the storage accounts visible to the caller.

#### Parameters

| Parameter | Required | Description |
| --------- | -------- | ----------- |
| subscription | yes | Subscription to query. |

#### Example prompts

- What storage accounts exist?
- List all storage accounts.
- storage accounts
- Show every storage account in the production subscription with its region
- Can you enumerate my storage accounts?

## See also

- [Available operations](#available-operations)
";

fn synthesize_large() -> String {
  let mut page = String::from(PAGE_SMALL);
  for index in 0..64 {
    page.push_str(&format!(
      "\n### storage.op-{index}\n\nDoes operation {index} against \
       `storage.op-{index}`.\n\n#### Parameters\n\n| Parameter | Required \
       | Description |\n| - | - | - |\n| subscription | yes | Sub. |\n\n\
       #### Example prompts\n\n- What does op {index} do?\n- Run op \
       {index} now.\n- op {index}\n- Please run operation {index} against \
       every subscription I can currently see\n- List results of op \
       {index}.\n"
    ));
  }
  page
}

fn bench_parse(c: &mut Criterion) {
  c.bench_function("parse_small_page", |b| {
    b.iter(|| parser::parse(black_box("small.md"), black_box(PAGE_SMALL)));
  });

  let large = synthesize_large();
  c.bench_function("parse_large_page", |b| {
    b.iter(|| parser::parse(black_box("large.md"), black_box(&large)));
  });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
