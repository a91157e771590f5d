//! A sandboxed WASM module loader and interpreter used to run the game and
//! client-game logic modules out of process-trust: guest code only ever
//! touches its own linear memory and can only affect the host through the
//! imported functions a [`bridge::HostBridge`] chooses to expose.

pub mod bridge;
pub mod interp;
pub mod load;
pub mod opcode;
pub mod printf;
pub mod types;

pub use bridge::{FileHandleTable, GameDataLayout, HostBridge, MemoryView};
pub use interp::Interpreter;
pub use load::{load_module, Module};
pub use types::{Value, ValType, VmTrap};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExportKind, Value};

    /// Hand-assembles a minimal WASM module exporting a function
    /// `add(i32, i32) -> i32` that returns `a + b`, to exercise the loader
    /// and interpreter end to end without a real compiler toolchain.
    fn build_add_module() -> Vec<u8> {
        let mut m = Vec::new();
        m.extend_from_slice(&0x6d73_6100u32.to_le_bytes());
        m.extend_from_slice(&1u32.to_le_bytes());

        // type section: (i32, i32) -> i32
        let mut type_sec = Vec::new();
        type_sec.push(1); // 1 type
        type_sec.push(0x60);
        type_sec.push(2); // 2 params
        type_sec.push(0x7f);
        type_sec.push(0x7f);
        type_sec.push(1); // 1 result
        type_sec.push(0x7f);
        push_section(&mut m, 1, &type_sec);

        // function section: 1 function of type 0
        let mut func_sec = Vec::new();
        func_sec.push(1);
        func_sec.push(0);
        push_section(&mut m, 3, &func_sec);

        // memory section: 1 page, no max
        let mut mem_sec = Vec::new();
        mem_sec.push(1);
        mem_sec.push(0x00);
        mem_sec.push(1);
        push_section(&mut m, 5, &mem_sec);

        // export section: "add" -> function 0
        let mut exp_sec = Vec::new();
        exp_sec.push(1);
        exp_sec.push(3);
        exp_sec.extend_from_slice(b"add");
        exp_sec.push(0x00);
        exp_sec.push(0);
        push_section(&mut m, 7, &exp_sec);

        // code section: local.get 0; local.get 1; i32.add; end
        let mut body = Vec::new();
        body.push(0x00); // no locals
        body.push(0x20);
        body.push(0);
        body.push(0x20);
        body.push(1);
        body.push(0x6a); // i32.add
        body.push(0x0b); // end
        let mut code_sec = Vec::new();
        code_sec.push(1);
        let mut body_with_len = Vec::new();
        body_with_len.push(body.len() as u8);
        body_with_len.extend_from_slice(&body);
        code_sec.extend_from_slice(&body_with_len);
        push_section(&mut m, 10, &code_sec);

        m
    }

    fn push_section(m: &mut Vec<u8>, id: u8, payload: &[u8]) {
        m.push(id);
        m.push(payload.len() as u8); // payloads here always fit in one LEB byte
        m.extend_from_slice(payload);
    }

    struct NullBridge;
    impl HostBridge for NullBridge {
        fn call(&mut self, module: &str, field: &str, _memory: MemoryView<'_>, _args: &[Value]) -> Result<Option<Value>, VmTrap> {
            Err(VmTrap::UnknownImport { module: module.to_string(), field: field.to_string() })
        }
    }

    #[test]
    fn loads_and_runs_add_function() {
        let bytes = build_add_module();
        let module = load_module(&bytes).expect("module should load");
        let add_idx = module.find_export("add", ExportKind::Function).expect("add is exported");

        let mut interp = Interpreter::new(&module);
        let mut bridge = NullBridge;
        let result = interp
            .call_function(&mut bridge, add_idx, &[Value::I32(2), Value::I32(3)])
            .expect("call should not trap");
        match result {
            Some(Value::I32(v)) => assert_eq!(v, 5),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let bytes = vec![0u8; 16];
        let err = load_module(&bytes).unwrap_err();
        assert_eq!(err, crate::types::LoadError::BadMagic);
    }

    #[test]
    fn rejects_module_without_memory() {
        let mut m = Vec::new();
        m.extend_from_slice(&0x6d73_6100u32.to_le_bytes());
        m.extend_from_slice(&1u32.to_le_bytes());
        let err = load_module(&m).unwrap_err();
        assert_eq!(err, crate::types::LoadError::MissingMemory);
    }
}
