use std::process::ExitCode;

use hashbench::alloc::CountingAllocator;

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn main() -> ExitCode {
    hashbench::suite::main_entry()
}
