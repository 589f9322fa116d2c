//! Built-in starting content.

/// Conventional entry file name.
pub const DEFAULT_MAIN_FILE: &str = "App.vue";

/// Source of the entry file in a fresh playground.
pub const DEFAULT_CODE: &str = r#"<script setup lang="ts">
import { ref } from 'vue'

const msg = ref('Hello Fighting Design!')
</script>

<template>
  <f-button type="primary" @click="msg += '!'">{{ msg }}</f-button>
</template>
"#;
