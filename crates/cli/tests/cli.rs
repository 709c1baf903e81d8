use assert_cmd::Command;

#[test]
fn help_prints_usage() {
    Command::cargo_bin("bookstore-cli")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("bookstore-cli")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
