// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use seqsplice::batch::{
    run_batch, BatchConfig, CollaboratorError, Collaborators, DiffRenderer, DocumentSink,
    SourceDocument, StopSignal, WriteRequest,
};
use seqsplice::model::Document;
use seqsplice::ops::{self, Instruction};
use seqsplice::report::UnifiedDiff;

mod fixtures;
mod profiler;

struct DiscardSink;

impl DocumentSink for DiscardSink {
    fn commit(&self, request: &WriteRequest<'_>) -> Result<(), CollaboratorError> {
        black_box(request.updated.len());
        Ok(())
    }
}

struct NoDiff;

impl DiffRenderer for NoDiff {
    fn render(&self, _path: &Path, _original: &str, _updated: &str) -> String {
        String::new()
    }
}

fn instruction() -> Instruction {
    Instruction::InsertBlockAfterGroup {
        group_name: fixtures::TARGET_GROUP.to_owned(),
        block_lines: fixtures::block(),
    }
}

fn benches_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.insert_block");
    let instruction = instruction();
    for case in fixtures::Case::ALL {
        let doc = Document::parse(&fixtures::diagram(case));
        let instruction = instruction.clone();
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let updated = ops::apply(black_box(&doc), &instruction).expect("apply");
                black_box(updated.line_count())
            })
        });
    }
    group.finish();
}

fn benches_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch.run");
    let instruction = instruction();
    for (case_id, files, with_diff) in [("files_64", 64usize, false), ("files_64_diff", 64, true)] {
        let text = fixtures::diagram(fixtures::Case::Medium);
        let documents: Vec<SourceDocument> = (0..files)
            .map(|idx| SourceDocument::loaded(format!("d{idx}.puml"), text.clone()))
            .collect();
        let instruction = instruction.clone();
        group.throughput(Throughput::Elements(files as u64));
        group.bench_function(case_id, move |b| {
            let diff: &dyn DiffRenderer = if with_diff { &UnifiedDiff } else { &NoDiff };
            let collaborators = Collaborators {
                sink: &DiscardSink,
                diff,
            };
            b.iter(|| {
                let report = run_batch(
                    &BatchConfig::default(),
                    &instruction,
                    black_box(&documents),
                    collaborators,
                    &StopSignal::new(),
                )
                .expect("run_batch");
                black_box(report.summary().succeeded)
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_ops, benches_batch
}
criterion_main!(benches);
