//! File templates for `harbour new`.
//!
//! ## Generated Tree
//!
//! ```text
//! <name>/
//! ├── CMakeLists.txt
//! ├── .harbourConfig
//! ├── external/
//! ├── include/
//! │   ├── comp.h
//! │   └── debug.hpp      (with -g)
//! └── src/
//!     └── main.cpp
//! ```

use crate::config::HarbourConfig;

pub fn cmake_lists(config: &HarbourConfig) -> String {
    let name = &config.project_name;
    let mut out = format!(
        r#"cmake_minimum_required(VERSION 3.16)
project({name} VERSION 1.0.0 LANGUAGES C CXX)

set(CMAKE_CXX_STANDARD {std})
set(CMAKE_CXX_STANDARD_REQUIRED ON)
set(CMAKE_EXPORT_COMPILE_COMMANDS ON)

include_directories(include)

set(CMAKE_RUNTIME_OUTPUT_DIRECTORY ${{CMAKE_BINARY_DIR}}/{bin})
set(CMAKE_LIBRARY_OUTPUT_DIRECTORY ${{CMAKE_BINARY_DIR}}/{lib})

set(SOURCES
	src/main.cpp
)

add_executable({name} ${{SOURCES}})

"#,
        name = name,
        std = config.cpp_version,
        bin = config.runtime_bin,
        lib = config.runtime_lib,
    );

    if config.enable_graphics {
        out.push_str(&format!(
            r#"add_subdirectory(external/glfw)
include_directories(external/glad/GL/include)
include_directories(external/glm)
file(GLOB GLAD_SOURCES external/glad/GL/src/gl.c)
target_sources({name} PRIVATE ${{GLAD_SOURCES}})
target_link_libraries({name} glfw)
"#
        ));
    }
    out
}

pub fn main_cpp(enable_debug: bool) -> String {
    let mut out = String::from("#include \"comp.h\"\n#include <iostream>\n");
    if enable_debug {
        out.push_str("#include \"debug.hpp\"\n");
    }
    out.push_str("\nint main() {\n");
    if enable_debug {
        out.push_str("  debug::print(\"Test debug log\");\n");
    }
    out.push_str("  std::cout << \"Hello, world!\" << std::endl;\n  return 0;\n}\n");
    out
}

/// Logging helper compiled in only when the project is built with `-DDEBUG`.
pub fn debug_hpp() -> &'static str {
    r#"#pragma once
#include <iostream>

class debug {
public:
  template<typename... Args>
  static void print(Args&&... args) {
    #ifdef DEBUG
    (std::cout << ... << args) << std::endl;
    #endif
  }
};
"#
}

pub fn comp_h() -> &'static str {
    "// comp.h stub\n"
}
