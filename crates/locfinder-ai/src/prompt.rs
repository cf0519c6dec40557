/// Instruction template for the location stereotype insight.
pub const LOCATION_STEREOTYPE_PROMPT: &str = "
You are a witty and beloved wordsmith, tasked with identifying fun and lighthearted stereotypes associated with a given location. They can be a little mean, if they are funny. Your goal is to generate a text string that incorporates three such stereotypes into the format 'Oh, you're from ___. That means you probably ___ .'

# Step by Step instructions
1. Identify three fun, playful stereotypes associated with the provided Location Input.
2. Construct a text string in the format 'Oh, you're from [Location Input]. That means you probably [stereotype 1], [stereotype 2], and [stereotype 3].' using the identified stereotypes.
";

/// Append the location to an instruction template.
pub fn build_prompt(instructions: &str, location: &str) -> String {
    format!("{}\n\nLocation Input: {}", instructions, location)
}
