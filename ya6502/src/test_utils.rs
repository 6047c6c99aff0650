use crate::cpu::Cpu;
use crate::memory::Ram;

/// Creates a CPU with a given program loaded at 0xF000, and resets it so it's
/// ready to execute. Sets the reset vector to the beginning of the program.
pub fn cpu_with_program(program: &[u8]) -> Cpu<Ram> {
    let memory = Box::new(Ram::with_test_program(program));
    let mut cpu = Cpu::new(memory);
    cpu.reset().unwrap();
    cpu
}

/// Returns a CPU that will execute given assembly code.
#[macro_export]
macro_rules! cpu_with_code {
    ($($tokens:tt)*) => {
        $crate::test_utils::cpu_with_program(&assemble6502!({
            start: 0xF000,
            code: {$($tokens)*}
        }))
    };
}
