//! Property tests for instruction decoding

use proptest::prelude::*;
use wdump_decoder::{decode_instruction, encode_instruction, Immediate, Instruction, InstructionDecoder};
use wdump_error::ErrorKind;
use wdump_format::{BinaryReader, ImmediateShape, OpCode};

fn immediate_for(shape: ImmediateShape) -> BoxedStrategy<Immediate> {
    match shape {
        ImmediateShape::Nullary | ImmediateShape::VarUint1 => Just(Immediate::None).boxed(),
        ImmediateShape::VarUint32 => any::<u32>().prop_map(Immediate::Index).boxed(),
        ImmediateShape::VarInt32 => any::<i32>().prop_map(Immediate::I32).boxed(),
        ImmediateShape::VarInt64 => any::<i64>().prop_map(Immediate::I64).boxed(),
        ImmediateShape::Float32 => any::<u32>().prop_map(Immediate::F32).boxed(),
        ImmediateShape::Float64 => any::<u64>().prop_map(Immediate::F64).boxed(),
        ImmediateShape::Memory => (any::<u32>(), any::<u32>())
            .prop_map(|(flags, offset)| Immediate::Memory { flags, offset })
            .boxed(),
        ImmediateShape::BlockSignature => any::<u8>().prop_map(Immediate::Block).boxed(),
        ImmediateShape::BranchTable => (prop::collection::vec(any::<u32>(), 0..8), any::<u32>())
            .prop_map(|(targets, default)| Immediate::BranchTable { targets, default })
            .boxed(),
        ImmediateShape::CallIndirect => any::<u32>()
            .prop_map(|type_index| Immediate::CallIndirect { type_index })
            .boxed(),
    }
}

fn instruction() -> impl Strategy<Value = Instruction> {
    prop::sample::select(OpCode::ALL.to_vec()).prop_flat_map(|op| {
        immediate_for(op.shape()).prop_map(move |immediate| Instruction {
            op,
            offset: 0,
            immediate,
        })
    })
}

proptest! {
    #[test]
    fn encoded_instruction_decodes_to_itself(instruction in instruction()) {
        let bytes = encode_instruction(&instruction).unwrap();
        let mut reader = BinaryReader::new(&bytes);
        prop_assert_eq!(decode_instruction(&mut reader).unwrap(), instruction);
        prop_assert!(reader.is_at_end());
    }

    #[test]
    fn every_proper_prefix_is_unaligned(instruction in instruction()) {
        let bytes = encode_instruction(&instruction).unwrap();
        for cut in 1..bytes.len() {
            let mut reader = BinaryReader::new(&bytes[..cut]);
            let err = InstructionDecoder::decode(&mut reader, cut, |_| Ok(())).unwrap_err();
            prop_assert!(err.is(ErrorKind::UnalignedStreamEnd), "cut at {}: {}", cut, err);
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut reader = BinaryReader::new(&bytes);
        let _ = InstructionDecoder::decode_all(&mut reader, bytes.len());
    }
}
