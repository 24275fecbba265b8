use anyhow::Context;

fn main() -> anyhow::Result<()> {
    squarecrop::run().context("cropping session failed")
}
